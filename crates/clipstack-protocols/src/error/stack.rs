//! Context stack engine errors.
//!
//! Validation failures are returned as values so UI code can render a
//! rejection reason without special-casing; none of these abort state.

use thiserror::Error;

use super::store::StoreError;

#[derive(Debug, Error)]
pub enum StackError {
    #[error("Snippet text too short: minimum {min} characters")]
    TooShort { min: usize },

    #[error("Snippet text too large: maximum {max} characters")]
    TooLarge { max: usize },

    #[error("Snippet with identical text already exists")]
    Duplicate,

    #[error("Adding snippet would exceed the {max} character budget")]
    CharLimitExceeded { max: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}
