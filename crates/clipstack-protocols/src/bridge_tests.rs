use serde_json::json;

use super::*;

#[test]
fn test_envelope_round_trip() {
    let envelope = BridgeEnvelope::new(
        Direction::ToPage,
        BridgeMessage::SetContext {
            tx_id: 7,
            context: "### ctx".to_string(),
        },
    );
    let value = envelope.to_value();
    let message = BridgeEnvelope::decode(&value, Direction::ToPage).unwrap();
    assert_eq!(
        message,
        BridgeMessage::SetContext {
            tx_id: 7,
            context: "### ctx".to_string()
        }
    );
}

#[test]
fn test_decode_rejects_foreign_source() {
    let value = json!({
        "source": "someone-else",
        "direction": "to-page",
        "kind": "clear-context",
        "tx_id": 1,
    });
    let err = BridgeEnvelope::decode(&value, Direction::ToPage).unwrap_err();
    assert!(matches!(err, BridgeError::UntrustedSource(_)));
}

#[test]
fn test_decode_rejects_wrong_direction() {
    let envelope = BridgeEnvelope::new(Direction::ToContent, BridgeMessage::ClearContext { tx_id: 1 });
    let err = BridgeEnvelope::decode(&envelope.to_value(), Direction::ToPage).unwrap_err();
    assert!(matches!(err, BridgeError::WrongDirection(_)));
}

#[test]
fn test_decode_rejects_malformed() {
    let value = json!({ "hello": "world" });
    let err = BridgeEnvelope::decode(&value, Direction::ToContent).unwrap_err();
    assert!(matches!(err, BridgeError::Malformed(_)));
}

#[test]
fn test_wire_tags_are_kebab_case() {
    let envelope = BridgeEnvelope::new(
        Direction::ToContent,
        BridgeMessage::ContextInjected {
            tx_id: 3,
            ok: true,
            mode: Some(InjectionMode::MessageList),
        },
    );
    let value = envelope.to_value();
    assert_eq!(value["direction"], "to-content");
    assert_eq!(value["kind"], "context-injected");
    assert_eq!(value["mode"], "message-list");
}

#[test]
fn test_message_tx_id() {
    assert_eq!(BridgeMessage::ContextExpired { tx_id: 42 }.tx_id(), 42);
    assert_eq!(
        BridgeMessage::PromptRequestFinished { tx_id: 9, ok: false }.tx_id(),
        9
    );
}
