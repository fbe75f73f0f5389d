//! # Juris Cache
//!
//! In-memory TTL cache for read results.
//!
//! TTLs are derived from the cache key prefix (`process:`, `person:`,
//! `document:`, `movement:`) unless the caller supplies an explicit TTL.
//! `get` checks expiry inline so a late sweep can never serve a stale hit;
//! a background sweep task physically removes expired entries on a fixed
//! interval.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use dashmap::DashMap;
use juris_config::CacheConfig;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// A cached payload with its creation time and TTL.
///
/// An entry is visible only while `now - stored_at < ttl`; expired entries
/// are logically absent even before the sweep removes them.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) >= self.ttl
    }
}

/// Cache counters, cumulative since construction or the last `clear`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Live entries currently stored (including not-yet-swept expired ones)
    pub entries: usize,
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing (or an expired entry)
    pub misses: u64,
    /// Entries physically removed because they had expired
    pub expired_removed: u64,
}

/// TTL cache keyed by string, with prefix-derived default TTLs.
pub struct CacheManager {
    entries: DashMap<String, CacheEntry>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    expired_removed: AtomicU64,
}

impl CacheManager {
    /// Create a cache with the given TTL configuration
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired_removed: AtomicU64::new(0),
        }
    }

    /// Create a cache with default TTLs
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Look up a key. Expired entries are treated as absent and removed.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // Remove inline so a dead entry does not wait for the sweep.
            if self.entries.remove(key).is_some() {
                self.expired_removed.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value. When `ttl` is `None` the TTL is derived from the key
    /// prefix.
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or_else(|| self.config.ttl_for_key(&key));
        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache store");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Remove a key; returns whether it was present
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop all entries and reset counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.expired_removed.store(0, Ordering::Relaxed);
        info!("cache cleared");
    }

    /// Current counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_removed: self.expired_removed.load(Ordering::Relaxed),
        }
    }

    /// Physically remove every expired entry; returns how many were removed
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.expired_removed.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "cache sweep removed expired entries");
        }
        removed
    }

    /// Spawn the periodic sweep task.
    ///
    /// The returned handle is owned by the caller; aborting it stops the
    /// sweep (the manager does this on shutdown).
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let period = self.config.sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately; skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                cache.remove_expired();
            }
        })
    }
}
