use serde_json::json;

use super::*;

const CTX: &str = "### SELECTED CONTEXT (User-Collected)\n...\nUser Question:\n";

fn run(payload: &mut Value) -> Option<InjectionMode> {
    for strategy in default_strategies() {
        if let Some(mode) = strategy.try_splice(payload, CTX) {
            return Some(mode);
        }
    }
    None
}

#[test]
fn test_plain_prompt_field() {
    let mut payload = json!({ "prompt": "what is rust?", "model": "m" });
    assert_eq!(run(&mut payload), Some(InjectionMode::PromptField));
    let prompt = payload["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("### SELECTED CONTEXT"));
    assert!(prompt.ends_with("what is rust?"));
}

#[test]
fn test_prompt_field_order_prefers_user_visible() {
    // "message" outranks "content" in the field order.
    let mut payload = json!({ "content": "aux", "message": "hi" });
    assert_eq!(run(&mut payload), Some(InjectionMode::PromptField));
    assert!(payload["message"].as_str().unwrap().starts_with("###"));
    assert_eq!(payload["content"], "aux");
}

#[test]
fn test_message_list_string_content() {
    let mut payload = json!({
        "messages": [
            { "role": "system", "content": "be nice" },
            { "role": "user", "content": "first" },
            { "role": "assistant", "content": "reply" },
            { "role": "user", "content": "second" },
        ]
    });
    assert_eq!(run(&mut payload), Some(InjectionMode::MessageList));
    // The newest user entry gets the context; the older one is untouched.
    assert!(payload["messages"][3]["content"].as_str().unwrap().starts_with("###"));
    assert_eq!(payload["messages"][1]["content"], "first");
    assert_eq!(payload["messages"][0]["content"], "be nice");
}

#[test]
fn test_message_list_part_array_content() {
    let mut payload = json!({
        "messages": [
            { "role": "user", "content": [ { "type": "text", "text": "question" } ] }
        ]
    });
    assert_eq!(run(&mut payload), Some(InjectionMode::MessageList));
    let text = payload["messages"][0]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("###"));
    assert!(text.ends_with("question"));
}

#[test]
fn test_chatgpt_author_parts_shape() {
    let mut payload = json!({
        "action": "next",
        "messages": [{
            "id": "m1",
            "author": { "role": "user" },
            "content": { "content_type": "text", "parts": ["tell me more"] }
        }]
    });
    assert_eq!(run(&mut payload), Some(InjectionMode::ProviderShape));
    let part = payload["messages"][0]["content"]["parts"][0].as_str().unwrap();
    assert!(part.starts_with("###"));
    assert!(part.ends_with("tell me more"));
}

#[test]
fn test_gemini_contents_parts_shape() {
    let mut payload = json!({
        "contents": [
            { "role": "user", "parts": [ { "text": "hello" } ] }
        ]
    });
    assert_eq!(run(&mut payload), Some(InjectionMode::ProviderShape));
    let text = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("###"));
}

#[test]
fn test_system_entry_synthesized_from_template() {
    // Message list present but with no user entry to splice into.
    let mut payload = json!({
        "messages": [
            { "role": "assistant", "content": "previous reply" }
        ]
    });
    assert_eq!(run(&mut payload), Some(InjectionMode::SystemEntry));
    let entries = payload["messages"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["role"], "system");
    assert_eq!(entries[0]["content"].as_str().unwrap(), CTX);
    assert_eq!(entries[1]["content"], "previous reply");
}

#[test]
fn test_system_entry_clones_nested_shape() {
    let mut payload = json!({
        "messages": [{
            "id": "m1",
            "author": { "role": "assistant" },
            "content": { "content_type": "text", "parts": ["earlier"] }
        }]
    });
    assert_eq!(run(&mut payload), Some(InjectionMode::SystemEntry));
    let first = &payload["messages"][0];
    assert_eq!(first["author"]["role"], "system");
    assert_eq!(first["content"]["parts"][0].as_str().unwrap(), CTX);
    assert!(first.get("id").is_none());
}

#[test]
fn test_unrecognized_payload_left_untouched() {
    let mut payload = json!({ "telemetry": { "event": "click" } });
    let before = payload.clone();
    assert_eq!(run(&mut payload), None);
    assert_eq!(payload, before);
}

#[test]
fn test_non_object_payload() {
    let mut payload = json!([1, 2, 3]);
    assert_eq!(run(&mut payload), None);
}
