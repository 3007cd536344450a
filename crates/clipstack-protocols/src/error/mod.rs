//! Error types shared across the Clipstack crates.

mod bridge;
mod registry;
mod stack;
mod store;

pub use bridge::*;
pub use registry::*;
pub use stack::*;
pub use store::*;
