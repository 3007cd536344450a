//! # Clipstack Config
//!
//! Configuration schema, defaults, and JSON loader. Empirically tuned
//! constants (transaction TTL, DOM clear delay, scope poll interval) live
//! here so nothing downstream hard-codes them.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::ClipstackConfig;
