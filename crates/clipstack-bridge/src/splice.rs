//! Payload-shape splice strategies.
//!
//! Each strategy is given a chance to claim an outgoing JSON payload and
//! splice the compiled context into it. Strategies run in a fixed order:
//! user-visible prompt fields first, then role-tagged message lists, then
//! provider-specific nested shapes, and only when none match a synthesized
//! hidden system entry cloned from an existing entry's shape.

use serde_json::{json, Value};

use clipstack_protocols::InjectionMode;

/// One payload shape matcher/transformer.
pub trait PayloadSplice: Send + Sync {
    fn id(&self) -> &str;

    /// Attempt to splice `context` into `payload`. Returns the injection
    /// mode on success and must leave the payload untouched on failure.
    fn try_splice(&self, payload: &mut Value, context: &str) -> Option<InjectionMode>;
}

/// The default strategy order.
pub fn default_strategies() -> Vec<Box<dyn PayloadSplice>> {
    vec![
        Box::new(PromptFieldSplice),
        Box::new(MessageListSplice),
        Box::new(ProviderShapeSplice),
        Box::new(SystemEntrySplice),
    ]
}

fn prepend(field: &mut Value, context: &str) {
    if let Value::String(existing) = field {
        *field = Value::String(format!("{}{}", context, existing));
    }
}

/// Top-level plain string prompt fields.
pub struct PromptFieldSplice;

const PROMPT_FIELDS: &[&str] = &["prompt", "message", "input", "text", "q", "query", "content"];

impl PayloadSplice for PromptFieldSplice {
    fn id(&self) -> &str {
        "prompt-field"
    }

    fn try_splice(&self, payload: &mut Value, context: &str) -> Option<InjectionMode> {
        let object = payload.as_object_mut()?;
        for field in PROMPT_FIELDS {
            if let Some(value) = object.get_mut(*field) {
                if value.is_string() {
                    prepend(value, context);
                    return Some(InjectionMode::PromptField);
                }
            }
        }
        None
    }
}

/// Role-tagged message lists with string or text-part content.
pub struct MessageListSplice;

impl MessageListSplice {
    /// Splice into a message entry's content; string or parts array.
    fn splice_content(content: &mut Value, context: &str) -> bool {
        match content {
            Value::String(_) => {
                prepend(content, context);
                true
            }
            Value::Array(parts) => {
                for part in parts.iter_mut().rev() {
                    if part.is_string() {
                        prepend(part, context);
                        return true;
                    }
                    if let Some(text) = part.get_mut("text") {
                        if text.is_string() {
                            prepend(text, context);
                            return true;
                        }
                    }
                }
                false
            }
            _ => false,
        }
    }
}

impl PayloadSplice for MessageListSplice {
    fn id(&self) -> &str {
        "message-list"
    }

    fn try_splice(&self, payload: &mut Value, context: &str) -> Option<InjectionMode> {
        let messages = payload.get_mut("messages")?.as_array_mut()?;
        // Prefer the newest user-visible entry.
        for entry in messages.iter_mut().rev() {
            if entry.get("role").and_then(Value::as_str) != Some("user") {
                continue;
            }
            if let Some(content) = entry.get_mut("content") {
                if Self::splice_content(content, context) {
                    return Some(InjectionMode::MessageList);
                }
            }
        }
        None
    }
}

/// Provider-specific nested content shapes.
pub struct ProviderShapeSplice;

impl ProviderShapeSplice {
    /// `messages[].content.parts[]` with the author role nested one level
    /// down (ChatGPT-shaped bodies).
    fn try_author_parts(payload: &mut Value, context: &str) -> Option<InjectionMode> {
        let messages = payload.get_mut("messages")?.as_array_mut()?;
        for entry in messages.iter_mut().rev() {
            let role = entry
                .pointer("/author/role")
                .and_then(Value::as_str)
                .unwrap_or("user");
            if role != "user" {
                continue;
            }
            let Some(parts) = entry
                .pointer_mut("/content/parts")
                .and_then(Value::as_array_mut)
            else {
                continue;
            };
            if let Some(part) = parts.iter_mut().rev().find(|p| p.is_string()) {
                prepend(part, context);
                return Some(InjectionMode::ProviderShape);
            }
        }
        None
    }

    /// `contents[].parts[].text` (Gemini-shaped bodies).
    fn try_contents_parts(payload: &mut Value, context: &str) -> Option<InjectionMode> {
        let contents = payload.get_mut("contents")?.as_array_mut()?;
        for entry in contents.iter_mut().rev() {
            let role = entry.get("role").and_then(Value::as_str).unwrap_or("user");
            if role != "user" {
                continue;
            }
            let Some(parts) = entry.get_mut("parts").and_then(Value::as_array_mut) else {
                continue;
            };
            for part in parts.iter_mut().rev() {
                if let Some(text) = part.get_mut("text") {
                    if text.is_string() {
                        prepend(text, context);
                        return Some(InjectionMode::ProviderShape);
                    }
                }
            }
        }
        None
    }
}

impl PayloadSplice for ProviderShapeSplice {
    fn id(&self) -> &str {
        "provider-shape"
    }

    fn try_splice(&self, payload: &mut Value, context: &str) -> Option<InjectionMode> {
        Self::try_author_parts(payload, context)
            .or_else(|| Self::try_contents_parts(payload, context))
    }
}

/// Last resort: synthesize a hidden system-role entry cloned from an
/// existing entry's shape so the provider still accepts the payload.
pub struct SystemEntrySplice;

impl SystemEntrySplice {
    fn synthesize(template: &Value, context: &str) -> Option<Value> {
        let mut entry = template.clone();
        let object = entry.as_object_mut()?;
        object.remove("id");

        if object.contains_key("author") {
            object.insert("author".to_string(), json!({ "role": "system" }));
        } else {
            object.insert("role".to_string(), Value::String("system".to_string()));
        }

        match template.get("content") {
            Some(Value::String(_)) => {
                object.insert("content".to_string(), Value::String(context.to_string()));
            }
            Some(content) if content.get("parts").is_some() => {
                object.insert(
                    "content".to_string(),
                    json!({ "content_type": "text", "parts": [context] }),
                );
            }
            Some(Value::Array(_)) => {
                object.insert(
                    "content".to_string(),
                    json!([{ "type": "text", "text": context }]),
                );
            }
            _ => {
                if object.contains_key("parts") {
                    object.insert("parts".to_string(), json!([{ "text": context }]));
                } else {
                    object.insert("content".to_string(), Value::String(context.to_string()));
                }
            }
        }

        Some(entry)
    }
}

impl PayloadSplice for SystemEntrySplice {
    fn id(&self) -> &str {
        "system-entry"
    }

    fn try_splice(&self, payload: &mut Value, context: &str) -> Option<InjectionMode> {
        for list_field in ["messages", "contents"] {
            let Some(list) = payload.get_mut(list_field).and_then(Value::as_array_mut) else {
                continue;
            };
            let Some(template) = list.first() else {
                continue;
            };
            if let Some(entry) = Self::synthesize(template, context) {
                list.insert(0, entry);
                return Some(InjectionMode::SystemEntry);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "splice_tests.rs"]
mod tests;
