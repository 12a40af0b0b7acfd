// Chunk: docs/chunks/scroll_position_cache - Debounced and throttled scroll saves
//!
//! Remembers the scroll position of each notebook across list sessions.
//!
//! Positions are keyed by list identity and stored as one JSON object under
//! [`SCROLL_POSITIONS_KEY`]. Scroll events arrive far faster than anything
//! should be written, so two stages coalesce them:
//!
//! - the in-memory map is updated on the trailing edge of a
//!   `SCROLL_DEBOUNCE_MS` debounce
//! - the map is written to storage at most once per `SCROLL_THROTTLE_MS`,
//!   leading and trailing edge
//!
//! Each write re-reads the stored map and merges only the entries this
//! cache changed, so instances sharing storage keep each other's notebooks.
//!
//! Storage and parse failures are logged and dropped; the cache then works
//! in memory only.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use tracing::debug;

use crate::debounce::{Debouncer, Throttle, SCROLL_DEBOUNCE_MS, SCROLL_THROTTLE_MS};
use crate::storage::Storage;

/// Storage key holding the JSON map of positions
pub const SCROLL_POSITIONS_KEY: &str = "lite-notebook.scroll-positions";

/// Per-notebook scroll offsets with coalesced persistence.
#[derive(Debug)]
pub struct ScrollPositionCache<S: Storage> {
    storage: S,
    positions: BTreeMap<String, f32>,
    memory: Debouncer<(String, f32)>,
    durable: Throttle<()>,
    /// Identities changed in memory and not yet written
    unsaved: BTreeSet<String>,
}

impl<S: Storage> ScrollPositionCache<S> {
    /// Creates a cache, loading any stored positions.
    pub fn new(storage: S) -> Self {
        let positions = load_positions(&storage);
        Self {
            storage,
            positions,
            memory: Debouncer::new(SCROLL_DEBOUNCE_MS),
            durable: Throttle::new(SCROLL_THROTTLE_MS),
            unsaved: BTreeSet::new(),
        }
    }

    /// The remembered position for a notebook.
    pub fn position(&self, identity: &str) -> Option<f32> {
        self.positions.get(identity).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Notes a scroll position. Takes effect after the debounce window.
    pub fn record(&mut self, identity: &str, scroll_top: f32, now: Instant) {
        if !scroll_top.is_finite() {
            return;
        }
        self.memory.register((identity.to_string(), scroll_top.max(0.0)), now);
    }

    /// Drives both trailing edges.
    pub fn tick(&mut self, now: Instant) {
        if let Some((identity, scroll_top)) = self.memory.flush_ready(now) {
            self.commit(identity, scroll_top);
            if self.durable.submit((), now).is_some() {
                self.persist();
            }
        }
        if self.durable.flush_ready(now).is_some() {
            self.persist();
        }
    }

    /// When `tick` next has work to do, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.memory.deadline(), self.durable.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Commits and writes everything pending, ignoring both timers.
    pub fn flush(&mut self) {
        if let Some((identity, scroll_top)) = self.memory.take() {
            self.commit(identity, scroll_top);
        }
        self.durable.cancel();
        if !self.unsaved.is_empty() {
            self.persist();
        }
    }

    fn commit(&mut self, identity: String, scroll_top: f32) {
        if self.positions.get(&identity) != Some(&scroll_top) {
            self.positions.insert(identity.clone(), scroll_top);
            self.unsaved.insert(identity);
        }
    }

    fn persist(&mut self) {
        if self.unsaved.is_empty() {
            return;
        }
        let mut merged = load_positions(&self.storage);
        for identity in &self.unsaved {
            if let Some(top) = self.positions.get(identity) {
                merged.insert(identity.clone(), *top);
            }
        }
        let json = match serde_json::to_string(&merged) {
            Ok(json) => json,
            Err(e) => {
                debug!(error = %e, "failed to encode scroll positions");
                return;
            }
        };
        match self.storage.set(SCROLL_POSITIONS_KEY, &json) {
            Ok(()) => {
                self.positions = merged;
                self.unsaved.clear();
            }
            Err(e) => debug!(error = %e, "failed to save scroll positions"),
        }
    }
}

fn load_positions<S: Storage + ?Sized>(storage: &S) -> BTreeMap<String, f32> {
    let raw = match storage.get(SCROLL_POSITIONS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            debug!(error = %e, "failed to read scroll positions");
            return BTreeMap::new();
        }
    };
    match serde_json::from_str::<BTreeMap<String, f32>>(&raw) {
        Ok(mut positions) => {
            positions.retain(|_, top| top.is_finite() && *top >= 0.0);
            positions
        }
        Err(e) => {
            debug!(error = %e, "discarding unreadable scroll positions");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::rc::Rc;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn stored(storage: &MemoryStorage) -> Option<BTreeMap<String, f32>> {
        let raw = storage.get(SCROLL_POSITIONS_KEY).unwrap()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    // ==================== Loading ====================

    #[test]
    fn test_loads_stored_positions() {
        let storage = MemoryStorage::with_entries([(SCROLL_POSITIONS_KEY, r#"{"a.ipynb": 420.0}"#)]);
        let cache = ScrollPositionCache::new(storage);
        assert_eq!(cache.position("a.ipynb"), Some(420.0));
    }

    #[test]
    fn test_garbage_is_swallowed() {
        let storage = MemoryStorage::with_entries([(SCROLL_POSITIONS_KEY, "[1, 2")]);
        let cache = ScrollPositionCache::new(storage);
        assert!(cache.is_empty());
    }

    // ==================== Debounce ====================

    #[test]
    fn test_memory_update_waits_for_quiet() {
        let mut cache = ScrollPositionCache::new(MemoryStorage::new());
        let t0 = Instant::now();
        cache.record("nb", 100.0, t0);
        cache.record("nb", 200.0, t0 + ms(100));

        cache.tick(t0 + ms(200));
        assert_eq!(cache.position("nb"), None);

        cache.tick(t0 + ms(250));
        assert_eq!(cache.position("nb"), Some(200.0));
    }

    // ==================== Throttle ====================

    #[test]
    fn test_first_commit_written_immediately() {
        let storage = Rc::new(MemoryStorage::new());
        let mut cache = ScrollPositionCache::new(Rc::clone(&storage));
        let t0 = Instant::now();
        cache.record("nb", 100.0, t0);
        cache.tick(t0 + ms(150));
        assert_eq!(stored(&storage).unwrap().get("nb"), Some(&100.0));
    }

    #[test]
    fn test_later_commits_coalesced_to_trailing_write() {
        let storage = Rc::new(MemoryStorage::new());
        let mut cache = ScrollPositionCache::new(Rc::clone(&storage));
        let t0 = Instant::now();

        cache.record("nb", 100.0, t0);
        cache.tick(t0 + ms(150));
        cache.record("nb", 300.0, t0 + ms(200));
        cache.tick(t0 + ms(350));

        // Committed in memory, write held back by the throttle
        assert_eq!(cache.position("nb"), Some(300.0));
        assert_eq!(stored(&storage).unwrap().get("nb"), Some(&100.0));

        cache.tick(t0 + ms(1150));
        assert_eq!(stored(&storage).unwrap().get("nb"), Some(&300.0));
    }

    #[test]
    fn test_flush_writes_everything() {
        let storage = Rc::new(MemoryStorage::new());
        let mut cache = ScrollPositionCache::new(Rc::clone(&storage));
        cache.record("nb", 640.0, Instant::now());
        cache.flush();
        assert_eq!(stored(&storage).unwrap().get("nb"), Some(&640.0));
        assert_eq!(cache.next_deadline(), None);
    }

    #[test]
    fn test_shared_storage_keeps_other_notebooks() {
        let storage = Rc::new(MemoryStorage::new());
        let mut first = ScrollPositionCache::new(Rc::clone(&storage));
        let mut second = ScrollPositionCache::new(Rc::clone(&storage));

        first.record("a.ipynb", 100.0, Instant::now());
        first.flush();
        second.record("b.ipynb", 200.0, Instant::now());
        second.flush();
        first.record("a.ipynb", 150.0, Instant::now());
        first.flush();

        let positions = stored(&storage).unwrap();
        assert_eq!(positions.get("a.ipynb"), Some(&150.0));
        assert_eq!(positions.get("b.ipynb"), Some(&200.0));
        assert_eq!(first.position("b.ipynb"), Some(200.0));
    }

    #[test]
    fn test_unavailable_storage_keeps_memory() {
        let mut cache = ScrollPositionCache::new(MemoryStorage::unavailable());
        let t0 = Instant::now();
        cache.record("nb", 50.0, t0);
        cache.tick(t0 + ms(150));
        cache.flush();
        assert_eq!(cache.position("nb"), Some(50.0));
    }
}
