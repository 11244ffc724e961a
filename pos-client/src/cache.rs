//! Keyed cache with a fixed time-to-live
//!
//! Used for cross-entity lazy loading (menu lookups between dashboards).
//! Each instance owns its entries and its TTL; there is no process-global
//! cache, so tests construct and drop their own.

use parking_lot::RwLock;
use shared::util::now_millis;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// TTL cache
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl_ms: i64,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    inserted_at: i64,
    value: V,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_ms: ttl.as_millis() as i64,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get a live entry; expired entries are evicted on read.
    pub fn get(&self, key: &K) -> Option<V> {
        let expired = {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if now_millis() - entry.inserted_at < self.ttl_ms {
                return Some(entry.value.clone());
            }
            true
        };
        if expired {
            self.entries.write().remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.write().insert(
            key,
            CacheEntry {
                inserted_at: now_millis(),
                value,
            },
        );
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.write().remove(key);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
