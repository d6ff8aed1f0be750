//! State cache: keyed, expiring snapshots of component models.
//!
//! The cache is an optimization, never a source of truth. Reads that fail
//! for any reason are cache misses; writes that fail are logged and dropped.
//!
//! Entries are stored as JSON of the shape `{"component": [ComponentModel]}`
//! under a caller-supplied key.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mosaic_api::ComponentModel;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Backing store for cache entries.
///
/// Implementations synchronize internally and treat an entry whose expiry
/// is at or before the current time as absent.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set(&self, key: &str, payload: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()>;

    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Persisted entry layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePayload {
    pub component: Vec<ComponentModel>,
}

/// A cache namespace for one component.
#[derive(Clone)]
pub struct StateCache {
    key: String,
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl StateCache {
    pub fn new(key: impl Into<String>, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            store,
            ttl,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot a model, expiring `ttl` from now. Failures are logged.
    pub fn cache(&self, model: &ComponentModel) {
        if let Err(e) = self.try_save(std::slice::from_ref(model)) {
            tracing::warn!(key = %self.key, "Failed to write state cache: {}", e);
        }
    }

    /// Restore the cached model, if any.
    pub fn load(&self) -> Option<ComponentModel> {
        self.load_all().and_then(|models| models.into_iter().next())
    }

    /// Restore every cached model, if any.
    pub fn load_all(&self) -> Option<Vec<ComponentModel>> {
        match self.try_load() {
            Ok(models) => models,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read state cache: {}", e);
                None
            }
        }
    }

    /// Drop the cached entry.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, "Failed to clear state cache: {}", e);
        }
    }

    fn try_save(&self, models: &[ComponentModel]) -> Result<(), CacheError> {
        let payload = CachePayload {
            component: models.to_vec(),
        };
        let json = serde_json::to_string(&payload).map_err(CacheError::Encode)?;
        self.store.set(&self.key, &json, Utc::now() + self.ttl)?;
        Ok(())
    }

    fn try_load(&self) -> Result<Option<Vec<ComponentModel>>, CacheError> {
        let Some(json) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let mut payload: CachePayload =
            serde_json::from_str(&json).map_err(CacheError::Decode)?;
        for model in &mut payload.component {
            model.refresh_indexes();
        }
        Ok(Some(payload.component))
    }
}
