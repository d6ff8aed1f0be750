//! Engine - the explicitly initialized, process-wide context.
//!
//! Bundles everything components share: configuration, the view registry,
//! the dispatcher and the state cache store. Clone it into each component.

use std::sync::Arc;

use anyhow::Result;

use crate::cache::{CacheStore, MemoryStore, SqliteStore, StateCache};
use crate::config::EngineConfig;
use crate::dispatch::Dispatcher;
use crate::registry::Registry;

#[derive(Clone)]
pub struct Engine {
    config: Arc<EngineConfig>,
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
    store: Arc<dyn CacheStore>,
}

impl Engine {
    /// Create an engine with an empty registry and an in-memory cache store.
    pub fn new(config: EngineConfig, dispatcher: Dispatcher) -> Self {
        let registry = Arc::new(Registry::new(config.default_identifier.clone()));
        Self {
            config: Arc::new(config),
            registry,
            dispatcher,
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Share an existing registry.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = store;
        self
    }

    /// Persist state caches in SQLite at `config.cache_path`.
    pub fn with_sqlite_cache(self) -> Result<Self> {
        let store = SqliteStore::open(&self.config.cache_path)?;
        Ok(self.with_store(Arc::new(store)))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// A state cache namespace using the configured TTL.
    pub fn state_cache(&self, key: impl Into<String>) -> StateCache {
        StateCache::new(key, self.store.clone(), self.config.cache_ttl)
    }
}
