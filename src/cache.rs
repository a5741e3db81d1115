//! Process-wide TTL cache for rendered listing contexts.
//!
//! Entries expire by age or by an explicit [`TtlCache::clear`]; mutations
//! elsewhere in the app never invalidate them, so a cached listing may be
//! stale for up to one TTL. That staleness window is accepted behavior.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

pub struct TtlCache {
    ttl: Duration,
    entries: DashMap<String, Entry>,
}

struct Entry {
    stored_at: Instant,
    value: Value,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Cached value for `key`, unless the entry has outlived the TTL.
    /// Expired entries are evicted lazily on read.
    pub fn get(&self, key: &str) -> Option<Value> {
        let hit = self.entries.get(key)?;
        if hit.stored_at.elapsed() < self.ttl {
            return Some(hit.value.clone());
        }
        drop(hit);
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.insert(
            key.into(),
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Drops every entry; the only invalidation besides expiry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
