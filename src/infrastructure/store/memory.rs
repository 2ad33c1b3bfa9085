//! In-memory TTL store.
//!
//! Process-local [`TtlStore`] implementation with lazy expiry: entries are
//! dropped when a read or delete finds them past their deadline. Used by
//! tests and single-node development runs; it never reports `Unavailable`.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::ttl_store::{StoreError, TtlStore};

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local implementation of [`TtlStore`].
#[derive(Default)]
pub struct InMemoryTtlStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryTtlStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TtlStore for InMemoryTtlStore {
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), StoreError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(seconds),
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: take the write lock and re-check before removing, the
        // entry may have been replaced since the read lock was dropped.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            if entry.is_expired(now) {
                entries.remove(key);
            } else {
                return Ok(Some(entry.value.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        match self.entries.write().remove(key) {
            // An expired entry is evicted but reported absent, matching a
            // store whose TTL eviction already ran.
            Some(entry) => Ok(!entry.is_expired(now)),
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
