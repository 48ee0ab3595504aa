//! Single-slot, time-boxed memo of the last successfully fetched document.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// The last raw payload and when it arrived.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub raw_payload: String,
    pub fetched_at: DateTime<Utc>,
    stored_at: Instant,
    generation: u64,
}

impl CacheEntry {
    /// Monotonic counter bumped on every `put`; lets callers tell whether
    /// something they derived from the cache is still current.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds at most one [`CacheEntry`]; every [`ResultCache::put`] overwrites it.
///
/// Freshness uses tokio's clock so tests can drive it with
/// `tokio::time::pause` / `advance`.
#[derive(Debug)]
pub struct ResultCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
    generation: u64,
}

impl ResultCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: None,
            ttl,
            generation: 0,
        }
    }

    /// Cached raw text regardless of age, or `None` before the first `put`.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.raw_payload.as_str())
    }

    #[must_use]
    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// Replaces the slot with `raw`, stamped now.
    pub fn put(&mut self, raw: String) {
        self.generation += 1;
        self.entry = Some(CacheEntry {
            raw_payload: raw,
            fetched_at: Utc::now(),
            stored_at: Instant::now(),
            generation: self.generation,
        });
    }

    /// `true` while the last `put` is younger than the TTL. An empty cache is
    /// never fresh.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| e.stored_at.elapsed() < self.ttl)
    }

    /// Drops the cached entry so the next sync goes to the network.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
