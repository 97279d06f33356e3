use std::sync::Arc;

use crate::error::Result;
use crate::models::Registration;
use crate::store::{KeyValueStore, MemoryStore};

pub const IDENTIFIER_KEY: &str = "inscription_id";
pub const PROFILE_KEY: &str = "inscription_data";

/// Local identity cache: the current user's registration identifier and the
/// last known profile snapshot, persisted in the device's key-value store.
///
/// There is no expiry and no conflict resolution; the last write wins.
#[derive(Clone)]
pub struct IdentityCache {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Cached identifier; blank values are treated as absent
    pub fn get(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(IDENTIFIER_KEY)?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty()))
    }

    /// Writes the identifier and the profile snapshot together
    pub fn set(&self, identifier: &str, profile: &Registration) -> Result<()> {
        let snapshot = serde_json::to_string(profile)?;
        self.store.set(IDENTIFIER_KEY, identifier)?;
        self.store.set(PROFILE_KEY, &snapshot)
    }

    pub fn set_identifier(&self, identifier: &str) -> Result<()> {
        self.store.set(IDENTIFIER_KEY, identifier)
    }

    /// Last profile snapshot. A snapshot that no longer parses is ignored
    /// rather than reported.
    pub fn profile(&self) -> Result<Option<Registration>> {
        let Some(raw) = self.store.get(PROFILE_KEY)? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(IDENTIFIER_KEY)?;
        self.store.remove(PROFILE_KEY)
    }
}

impl std::fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCache").finish_non_exhaustive()
    }
}
