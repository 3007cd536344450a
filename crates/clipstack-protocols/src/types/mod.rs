//! Core data model types.

mod snippet;
mod state;

pub use snippet::Snippet;
pub use state::{ContextStackState, StorageLimits};
