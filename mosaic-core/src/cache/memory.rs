//! In-process cache store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::CacheStore;

/// Mutex-guarded map of entries. Contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: DateTime<Utc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => {
                return Ok(Some(entry.payload.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, payload: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.to_string(),
                Entry {
                    payload: payload.to_string(),
                    expires_at,
                },
            );
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("k", "v", Utc::now() + Duration::hours(1)).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let store = MemoryStore::new();
        store.set("k", "v", Utc::now() - Duration::seconds(1)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_keys_do_not_share_state() {
        let store = MemoryStore::new();
        let expiry = Utc::now() + Duration::hours(1);
        store.set("a", "1", expiry).unwrap();
        store.set("b", "2", expiry).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}
