use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clipstack_config::ClipstackConfig;
use clipstack_core::{ScopeKey, ScopeResolver};
use clipstack_engine::{CONTEXT_MARKER, ContextStack};
use clipstack_protocols::error::StoreError;
use clipstack_protocols::{
    EditorKind, InjectionMode, StorageBackend, StorageListener, SystemClock,
};
use clipstack_store::{MemoryStorageBackend, ScopedStore};

use super::*;

struct FixedResolver;

impl ScopeResolver for FixedResolver {
    fn current_scope(&self) -> ScopeKey {
        ScopeKey::derive("https://chat.example/c/test", None)
    }
}

const URL: &str = "https://chat.example/c/test";

fn test_config() -> ClipstackConfig {
    ClipstackConfig {
        send_ttl_ms: 10_000,
        dom_clear_delay_ms: 1_200,
        ..Default::default()
    }
}

fn coordinator() -> (Arc<SendCoordinator>, mpsc::UnboundedReceiver<Value>, Arc<ContextStack>) {
    coordinator_with_backend(Arc::new(MemoryStorageBackend::new()))
}

fn coordinator_with_backend(
    backend: Arc<dyn StorageBackend>,
) -> (Arc<SendCoordinator>, mpsc::UnboundedReceiver<Value>, Arc<ContextStack>) {
    let store = Arc::new(ScopedStore::new(
        backend,
        Arc::new(FixedResolver),
        Arc::new(SystemClock),
    ));
    let stack = Arc::new(ContextStack::new(
        store,
        Arc::new(test_config()),
        Arc::new(SystemClock),
    ));
    let (coordinator, rx) = SendCoordinator::new(Arc::clone(&stack), Arc::new(SystemClock), &test_config());
    (coordinator, rx, stack)
}

fn decode_to_page(value: &Value) -> BridgeMessage {
    BridgeEnvelope::decode(value, Direction::ToPage).unwrap()
}

fn from_page(message: BridgeMessage) -> Value {
    BridgeEnvelope::new(Direction::ToContent, message).to_value()
}

#[tokio::test]
async fn test_begin_send_empty_stack_does_not_arm() {
    let (coordinator, mut rx, _stack) = coordinator();
    assert_eq!(coordinator.begin_send().await.unwrap(), None);
    assert_eq!(coordinator.pending_tx(), None);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_begin_send_arms_with_compiled_context() {
    let (coordinator, mut rx, stack) = coordinator();
    stack.add("remember this", URL).await.unwrap();

    let tx_id = coordinator.begin_send().await.unwrap().unwrap();
    assert_eq!(coordinator.pending_tx(), Some(tx_id));

    let sent = rx.try_recv().unwrap();
    match decode_to_page(&sent) {
        BridgeMessage::SetContext { tx_id: sent_tx, context } => {
            assert_eq!(sent_tx, tx_id);
            assert!(context.starts_with(CONTEXT_MARKER));
            assert!(context.contains("remember this"));
            assert!(context.ends_with("User Question:\n"));
        }
        other => panic!("expected set-context, got {:?}", other),
    }
}

#[tokio::test]
async fn test_begin_send_while_pending_reuses_transaction() {
    let (coordinator, mut rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();

    let first = coordinator.begin_send().await.unwrap().unwrap();
    let second = coordinator.begin_send().await.unwrap().unwrap();
    assert_eq!(first, second);

    // Only the first intent armed the page side.
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

/// Backend whose reads suspend, letting two send intents overlap mid-read.
struct SlowReadBackend {
    inner: MemoryStorageBackend,
}

#[async_trait]
impl StorageBackend for SlowReadBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }

    fn subscribe(&self, listener: StorageListener) -> u64 {
        self.inner.subscribe(listener)
    }

    fn unsubscribe(&self, token: u64) {
        self.inner.unsubscribe(token)
    }
}

#[tokio::test]
async fn test_overlapping_send_intents_share_one_transaction() {
    let (coordinator, mut rx, stack) = coordinator_with_backend(Arc::new(SlowReadBackend {
        inner: MemoryStorageBackend::new(),
    }));
    stack.add("snippet one", URL).await.unwrap();

    let first = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.begin_send().await })
    };
    let second = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.begin_send().await })
    };
    let (first, second) = tokio::join!(first, second);
    let first = first.unwrap().unwrap().unwrap();
    let second = second.unwrap().unwrap().unwrap();

    // Both intents observed Idle past the read, yet one transaction exists.
    assert_eq!(first, second);
    assert_eq!(coordinator.pending_tx(), Some(first));
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_successful_splice_settles_and_clears_stack() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();

    coordinator
        .handle_page_message(&from_page(BridgeMessage::ContextInjected {
            tx_id,
            ok: true,
            mode: Some(InjectionMode::MessageList),
        }))
        .await;

    assert_eq!(coordinator.pending_tx(), None);
    assert!(stack.state().await.unwrap().snippets.is_empty());
}

#[tokio::test]
async fn test_request_finished_settles() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();

    coordinator
        .handle_page_message(&from_page(BridgeMessage::PromptRequestFinished {
            tx_id,
            ok: true,
        }))
        .await;

    assert_eq!(coordinator.pending_tx(), None);
    assert!(stack.state().await.unwrap().snippets.is_empty());
}

#[tokio::test]
async fn test_failed_splice_stays_armed() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();

    coordinator
        .handle_page_message(&from_page(BridgeMessage::ContextInjected {
            tx_id,
            ok: false,
            mode: None,
        }))
        .await;

    assert_eq!(coordinator.pending_tx(), Some(tx_id));
    assert_eq!(stack.state().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mismatched_tx_id_is_ignored() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();

    coordinator
        .handle_page_message(&from_page(BridgeMessage::ContextInjected {
            tx_id: tx_id + 40,
            ok: true,
            mode: Some(InjectionMode::PromptField),
        }))
        .await;

    assert_eq!(coordinator.pending_tx(), Some(tx_id));
    assert_eq!(stack.state().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_untrusted_page_message_is_dropped() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();

    let mut forged = from_page(BridgeMessage::PromptRequestFinished { tx_id, ok: true });
    forged["source"] = Value::String("somebody-else".to_string());
    coordinator.handle_page_message(&forged).await;

    assert_eq!(coordinator.pending_tx(), Some(tx_id));
}

#[tokio::test(start_paused = true)]
async fn test_ttl_expiry_disarms_page_and_clears_stack() {
    let (coordinator, mut rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();
    let _armed = rx.try_recv().unwrap();

    tokio::time::sleep(Duration::from_millis(10_010)).await;

    assert_eq!(coordinator.pending_tx(), None);
    assert!(stack.state().await.unwrap().snippets.is_empty());

    match decode_to_page(&rx.try_recv().unwrap()) {
        BridgeMessage::ClearContext { tx_id: cleared } => assert_eq!(cleared, tx_id),
        other => panic!("expected clear-context, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_settlement_cancels_ttl_timer() {
    let (coordinator, mut rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();
    let _armed = rx.try_recv().unwrap();

    coordinator
        .handle_page_message(&from_page(BridgeMessage::PromptRequestFinished {
            tx_id,
            ok: true,
        }))
        .await;

    tokio::time::sleep(Duration::from_millis(20_000)).await;
    // No late clear-context after settlement.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_page_expiry_report_settles_and_clears() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let tx_id = coordinator.begin_send().await.unwrap().unwrap();

    coordinator
        .handle_page_message(&from_page(BridgeMessage::ContextExpired { tx_id }))
        .await;

    assert_eq!(coordinator.pending_tx(), None);
    assert!(stack.state().await.unwrap().snippets.is_empty());
}

#[tokio::test]
async fn test_new_send_after_settlement_gets_fresh_tx_id() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    let first = coordinator.begin_send().await.unwrap().unwrap();
    coordinator
        .handle_page_message(&from_page(BridgeMessage::PromptRequestFinished {
            tx_id: first,
            ok: true,
        }))
        .await;

    stack.add("snippet two", URL).await.unwrap();
    let second = coordinator.begin_send().await.unwrap().unwrap();
    assert!(second > first);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_ttl_timer() {
    let (coordinator, mut rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();
    coordinator.begin_send().await.unwrap().unwrap();
    let _armed = rx.try_recv().unwrap();

    coordinator.teardown();
    tokio::time::sleep(Duration::from_millis(20_000)).await;

    assert_eq!(coordinator.pending_tx(), None);
    assert!(rx.try_recv().is_err());
    // The stack survives teardown untouched.
    assert_eq!(stack.state().await.unwrap().len(), 1);
}

struct FakeEditor {
    value: String,
    caret: Option<CaretRange>,
    input_events: usize,
}

impl FakeEditor {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            caret: None,
            input_events: 0,
        }
    }
}

impl EditorSurface for FakeEditor {
    fn kind(&self) -> EditorKind {
        EditorKind::PlainText
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn caret(&self) -> Option<CaretRange> {
        self.caret
    }

    fn set_caret(&mut self, range: CaretRange) {
        self.caret = Some(range);
    }

    fn exec_insert_text(&mut self, _text: &str) -> bool {
        false
    }

    fn splice_at_caret(&mut self, _text: &str) -> bool {
        false
    }

    fn dispatch_input_events(&mut self) {
        self.input_events += 1;
    }
}

#[tokio::test(start_paused = true)]
async fn test_send_via_editor_prepends_context_then_clears() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();

    let mut editor = FakeEditor::new("what is this about?");
    assert!(coordinator.send_via_editor(&mut editor).await.unwrap());
    assert!(editor.value.starts_with(CONTEXT_MARKER));
    assert!(editor.value.ends_with("what is this about?"));
    assert_eq!(editor.input_events, 1);

    // The stack is still intact immediately after the splice.
    assert_eq!(stack.state().await.unwrap().len(), 1);
    tokio::time::sleep(Duration::from_millis(1_300)).await;
    assert!(stack.state().await.unwrap().snippets.is_empty());
}

#[tokio::test]
async fn test_send_via_editor_empty_stack_is_noop() {
    let (coordinator, _rx, _stack) = coordinator();
    let mut editor = FakeEditor::new("plain question");
    assert!(!coordinator.send_via_editor(&mut editor).await.unwrap());
    assert_eq!(editor.value, "plain question");
}

#[tokio::test]
async fn test_send_via_editor_skips_already_stamped_editor() {
    let (coordinator, _rx, stack) = coordinator();
    stack.add("snippet one", URL).await.unwrap();

    let stamped = format!("{}\nexisting block\n\nquestion", CONTEXT_MARKER);
    let mut editor = FakeEditor::new(&stamped);
    assert!(!coordinator.send_via_editor(&mut editor).await.unwrap());
    assert_eq!(editor.value, stamped);
    assert_eq!(stack.state().await.unwrap().len(), 1);
}
