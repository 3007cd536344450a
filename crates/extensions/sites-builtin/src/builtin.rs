//! Profiles for the chat UIs supported out of the box.

use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use clipstack_protocols::{InterceptMode, SiteCapability};

use crate::profile::SiteProfile;

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources.iter().filter_map(|s| Regex::new(s).ok()).collect()
}

/// ChatGPT-shaped UI: network interception against the backend-api
/// conversation endpoint, plain textarea composer.
pub fn chatgpt() -> Result<SiteProfile, regex::Error> {
    Ok(SiteProfile::new(
        "chatgpt",
        Regex::new(r"^(chatgpt\.com|chat\.openai\.com)$")?,
        InterceptMode::Network,
    )
    .conversation_pattern(Regex::new(r"/c/([0-9a-f-]{8,})")?)
    .editor_selectors(["#prompt-textarea", "form textarea"])
    .mount_selectors(["form[data-type='unified-composer']", "main form"])
    .endpoint_patterns(patterns(&[r"/backend-api/.*conversation"])))
}

/// Claude-shaped UI: network interception against the completion endpoint,
/// ProseMirror rich-text composer.
pub fn claude() -> Result<SiteProfile, regex::Error> {
    Ok(
        SiteProfile::new("claude", Regex::new(r"^claude\.ai$")?, InterceptMode::Network)
            .conversation_pattern(Regex::new(r"/chat/([0-9a-f-]{8,})")?)
            .editor_selectors(["div[contenteditable='true'].ProseMirror"])
            .mount_selectors(["fieldset"])
            .endpoint_patterns(patterns(&[
                r"/api/organizations/.*/chat_conversations/.*/completion",
                r"/api/organizations/.*/chat_conversations",
            ])),
    )
}

/// Gemini-shaped UI: submission rides a batched RPC whose payload is not a
/// spliceable JSON body, so the context goes straight into the editor on
/// send instead.
pub fn gemini() -> Result<SiteProfile, regex::Error> {
    Ok(SiteProfile::new(
        "gemini",
        Regex::new(r"^gemini\.google\.com$")?,
        InterceptMode::Dom,
    )
    .conversation_pattern(Regex::new(r"/app/([0-9a-f]{6,})")?)
    .editor_selectors(["rich-textarea div[contenteditable='true']"])
    .mount_selectors(["input-area-v2"])
    .endpoint_patterns(patterns(&[
        r":(generateContent|streamGenerateContent)\b",
    ])))
}

/// All builtin profiles, ready for registration. A profile whose patterns
/// fail to compile is skipped with a warning rather than taking the rest
/// down.
pub fn builtin_profiles() -> Vec<Arc<dyn SiteCapability>> {
    let candidates = [chatgpt(), claude(), gemini()];
    candidates
        .into_iter()
        .filter_map(|profile| match profile {
            Ok(p) => Some(Arc::new(p) as Arc<dyn SiteCapability>),
            Err(err) => {
                warn!("Skipping builtin profile with invalid pattern: {err}");
                None
            }
        })
        .collect()
}
