//! Outbound network seam for the page-network bridge.

use async_trait::async_trait;

use crate::error::BridgeError;

/// An outgoing request as seen at interception time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// HTTP method, uppercase.
    pub method: String,
    pub url: String,
    pub body: Option<String>,
}

impl OutboundRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
            body,
        }
    }

    /// Whether the method is a write operation worth inspecting.
    pub fn is_write(&self) -> bool {
        matches!(self.method.as_str(), "POST" | "PUT" | "PATCH")
    }
}

/// Response of the original network operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl FetchResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The page's own network layer. The bridge forwards every request through
/// this, modified or not, and awaits the result so the page still receives
/// its response.
#[async_trait]
pub trait PageFetch: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<FetchResponse, BridgeError>;
}
