//! Invalidate-on-write cache of the last read per table.
//!
//! # Data Flow
//! ```text
//! reader: get(key) ── hit ──▶ cached rows
//!            └─ miss ─▶ generation(key) → store.select → put_if_current(key, gen, rows)
//!
//! writer/deleter/toggle success:
//!     invalidate(key) → drop rows, bump generation, broadcast Invalidation
//! ```
//!
//! # Design Decisions
//! - Keyed by an explicit `CacheKey`, one per table; no global instance
//! - A read that started before an invalidation cannot repopulate the entry
//!   (generation check), so the next read always refetches
//! - Invalidation events are broadcast for anyone rendering the tables

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::observability::metrics;
use crate::store::Row;

/// Identifies one cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(pub &'static str);

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Fired after every successful mutation of the table behind `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub key: CacheKey,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    rows: Option<Arc<Vec<Row>>>,
}

/// Shared query cache. Cloning shares the underlying entries.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<DashMap<CacheKey, Slot>>,
    events: broadcast::Sender<Invalidation>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(DashMap::new()),
            events,
        }
    }

    /// Cached rows for `key`, if a read has completed since the last invalidation.
    pub fn get(&self, key: CacheKey) -> Option<Arc<Vec<Row>>> {
        self.entries.get(&key).and_then(|slot| slot.rows.clone())
    }

    /// Current generation of `key`. Capture before fetching.
    pub fn generation(&self, key: CacheKey) -> u64 {
        self.entries.get(&key).map(|slot| slot.generation).unwrap_or(0)
    }

    /// Store `rows` unless `key` was invalidated after `generation` was taken.
    pub fn put_if_current(&self, key: CacheKey, generation: u64, rows: Vec<Row>) -> bool {
        let mut slot = self.entries.entry(key).or_default();
        if slot.generation != generation {
            tracing::debug!(key = %key, "Discarding read that raced an invalidation");
            return false;
        }
        slot.rows = Some(Arc::new(rows));
        true
    }

    /// Drop the cached rows for `key` and notify subscribers.
    pub fn invalidate(&self, key: CacheKey) {
        {
            let mut slot = self.entries.entry(key).or_default();
            slot.generation += 1;
            slot.rows = None;
        }
        metrics::record_cache_invalidation(key.as_str());
        tracing::debug!(key = %key, "Cache invalidated");
        // No subscribers is fine.
        let _ = self.events.send(Invalidation { key });
    }

    /// Receive an event for every invalidation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }

    /// Whether `key` currently holds rows.
    pub fn contains(&self, key: CacheKey) -> bool {
        self.get(key).is_some()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
