//! Page-network bridge errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Untrusted message source: {0}")]
    UntrustedSource(String),

    #[error("Message direction not addressed to this side: {0}")]
    WrongDirection(String),

    #[error("Malformed bridge message: {0}")]
    Malformed(String),

    #[error("Network error: {0}")]
    Network(String),
}
