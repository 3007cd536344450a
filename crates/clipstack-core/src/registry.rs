//! Site-capability registry.
//!
//! Capabilities are selected once per page by URL; everything downstream
//! consults the returned interface and never branches on a site name.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use url::Url;

use clipstack_protocols::SiteCapability;
use clipstack_protocols::error::RegistryError;

/// Registry of per-site capabilities, keyed by capability id.
pub struct SiteRegistry {
    sites: DashMap<String, Arc<dyn SiteCapability>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self {
            sites: DashMap::new(),
        }
    }

    /// Register a capability. Ids are unique; a second registration under a
    /// taken id is rejected.
    pub fn register(&self, capability: Arc<dyn SiteCapability>) -> Result<(), RegistryError> {
        let id = capability.id().to_string();
        if self.sites.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        debug!("Registering site capability '{}'", id);
        self.sites.insert(id, capability);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn SiteCapability>> {
        self.sites.get(id).map(|entry| entry.value().clone())
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.sites.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Find the capability handling a page URL. Unparseable URLs match
    /// nothing.
    pub fn match_url(&self, url: &str) -> Option<Arc<dyn SiteCapability>> {
        let parsed = Url::parse(url).ok()?;
        self.sites
            .iter()
            .map(|entry| entry.value().clone())
            .find(|cap| cap.matches(&parsed))
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
