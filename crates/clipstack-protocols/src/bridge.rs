//! Tagged message protocol between the extension's isolated context and the
//! page context.
//!
//! Every message travels inside a [`BridgeEnvelope`] carrying a fixed source
//! tag and a direction tag. The boundary is untrusted: recipients must decode
//! through [`BridgeEnvelope::decode`], which rejects anything whose tags do
//! not validate, rather than deserializing payloads directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Source tag stamped on every envelope this system emits.
pub const ENVELOPE_SOURCE: &str = "clipstack";

/// Which side of the context boundary a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Isolated extension context -> page context.
    ToPage,
    /// Page context -> isolated extension context.
    ToContent,
}

/// How a compiled context ended up inside an outgoing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionMode {
    /// Prepended to a plain string prompt field.
    PromptField,
    /// Spliced into a role-tagged message list entry.
    MessageList,
    /// Spliced into a provider-specific nested content shape.
    ProviderShape,
    /// A synthesized hidden system/developer entry was added.
    SystemEntry,
}

/// Message kinds crossing the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BridgeMessage {
    /// Arm the page-side pending slot with a compiled context.
    SetContext { tx_id: u64, context: String },

    /// Drop the page-side pending slot for this transaction.
    ClearContext { tx_id: u64 },

    /// Splice outcome for a matched outgoing request.
    ContextInjected {
        tx_id: u64,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        mode: Option<InjectionMode>,
    },

    /// The page-side slot expired without being claimed.
    ContextExpired { tx_id: u64 },

    /// The intercepted network call completed.
    PromptRequestFinished { tx_id: u64, ok: bool },
}

impl BridgeMessage {
    /// Transaction id this message is correlated with.
    pub fn tx_id(&self) -> u64 {
        match self {
            BridgeMessage::SetContext { tx_id, .. }
            | BridgeMessage::ClearContext { tx_id }
            | BridgeMessage::ContextInjected { tx_id, .. }
            | BridgeMessage::ContextExpired { tx_id }
            | BridgeMessage::PromptRequestFinished { tx_id, .. } => *tx_id,
        }
    }
}

/// Envelope wrapping every cross-boundary message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeEnvelope {
    pub source: String,
    pub direction: Direction,
    #[serde(flatten)]
    pub message: BridgeMessage,
}

impl BridgeEnvelope {
    /// Wrap a message for sending in the given direction.
    pub fn new(direction: Direction, message: BridgeMessage) -> Self {
        Self {
            source: ENVELOPE_SOURCE.to_string(),
            direction,
            message,
        }
    }

    /// Serialize to the JSON value that actually crosses the boundary.
    pub fn to_value(&self) -> Value {
        // Envelope fields are plain data; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Decode and validate an inbound value.
    ///
    /// Rejects envelopes whose source tag is not ours or whose direction does
    /// not match what this side expects to receive.
    pub fn decode(value: &Value, expected: Direction) -> Result<BridgeMessage, BridgeError> {
        let envelope: BridgeEnvelope = serde_json::from_value(value.clone())
            .map_err(|e| BridgeError::Malformed(e.to_string()))?;

        if envelope.source != ENVELOPE_SOURCE {
            return Err(BridgeError::UntrustedSource(envelope.source));
        }
        if envelope.direction != expected {
            return Err(BridgeError::WrongDirection(format!(
                "{:?}",
                envelope.direction
            )));
        }

        Ok(envelope.message)
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
