//! Site capability registration.

use std::sync::Arc;

use tracing::{info, warn};

use clipstack_core::SiteRegistry;
use clipstack_protocols::SiteCapability;
use clipstack_sites_builtin::builtin_profiles;

/// Register the builtin site profiles. Duplicate ids are skipped with a
/// warning rather than failing the whole registration.
pub fn register_builtin_sites(registry: &SiteRegistry) {
    for profile in builtin_profiles() {
        let id = profile.id().to_string();
        match registry.register(profile) {
            Ok(()) => info!("Registered site capability: {}", id),
            Err(e) => warn!("Skipping site capability {}: {}", id, e),
        }
    }
}

/// A registry preloaded with the builtin site profiles.
pub fn default_registry() -> Arc<SiteRegistry> {
    let registry = Arc::new(SiteRegistry::new());
    register_builtin_sites(&registry);
    registry
}
