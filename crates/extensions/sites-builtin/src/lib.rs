//! # Clipstack Sites (builtin)
//!
//! Data-driven [`SiteProfile`] capability plus the profiles for the chat
//! UIs supported out of the box.

mod builtin;
mod profile;

pub use builtin::{builtin_profiles, chatgpt, claude, gemini};
pub use profile::SiteProfile;
