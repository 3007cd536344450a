//! # Clipstack Protocols
//!
//! Shared data model, message protocol, error taxonomy, and the trait seams
//! through which the engine talks to its host page.
//!
//! ## Components
//!
//! - [`types`] - Snippet, stack state, and storage limit types
//! - [`bridge`] - Tagged message protocol crossing the page/content boundary
//! - [`error`] - Error types shared across crates
//! - [`surface`] - Editor and document seams for DOM-side work
//! - [`site`] - Per-site capability interface and page location seam
//! - [`storage`] - Key/value persistence seam
//! - [`network`] - Outbound request seam for the page-network bridge
//! - [`clock`] - Injectable time source

pub mod bridge;
pub mod clock;
pub mod error;
pub mod network;
pub mod site;
pub mod storage;
pub mod surface;
pub mod types;

pub use bridge::{BridgeEnvelope, BridgeMessage, Direction, InjectionMode, ENVELOPE_SOURCE};
pub use clock::{Clock, SystemClock};
pub use network::{FetchResponse, OutboundRequest, PageFetch};
pub use site::{InterceptMode, LocationProvider, SiteCapability};
pub use storage::{StorageBackend, StorageListener};
pub use surface::{CaretRange, DocumentQuery, EditorKind, EditorSurface};
pub use types::{ContextStackState, Snippet, StorageLimits};
