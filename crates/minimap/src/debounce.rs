// Chunk: docs/chunks/scroll_position_cache - Debounced and throttled scroll saves
//!
//! Timer-coalescing primitives for values produced at scroll rate.
//!
//! Both are pure data structures with no I/O and no threads. The owner
//! passes `Instant` timestamps in and polls with `flush_ready(now)` from its
//! tick, which keeps them deterministic under test.
//!
//! - [`Debouncer`]: trailing edge only. Each new value restarts the window;
//!   the last value is released once the window passes without a new one.
//! - [`Throttle`]: leading and trailing edge. The first value in a quiet
//!   period is released immediately; later values inside the interval are
//!   coalesced and the last one is released when the interval ends.

use std::time::{Duration, Instant};

/// Debounce window for in-memory scroll position updates.
pub const SCROLL_DEBOUNCE_MS: u64 = 150;

/// Minimum interval between durable scroll position writes.
pub const SCROLL_THROTTLE_MS: u64 = 1000;

/// Releases the last registered value after a quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    /// The pending value and when it was registered
    pending: Option<(T, Instant)>,
    window: Duration,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer with the given window in milliseconds.
    pub fn new(window_ms: u64) -> Self {
        Self {
            pending: None,
            window: Duration::from_millis(window_ms),
        }
    }

    /// Registers a value, replacing any pending one and restarting the window.
    pub fn register(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Releases the pending value if its window has elapsed.
    pub fn flush_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.window => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// When the pending value becomes ready, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.window)
    }

    /// Releases the pending value immediately.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Rate-limits values to one per interval, keeping the latest.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    /// When a value was last released
    last_release: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Creates a throttle with the given interval in milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            last_release: None,
            pending: None,
        }
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        self.last_release
            .map_or(true, |at| now.saturating_duration_since(at) >= self.interval)
    }

    /// Submits a value.
    ///
    /// Returns it straight back (leading edge) if the interval has elapsed
    /// since the last release. Otherwise it replaces the pending value and
    /// `None` is returned.
    pub fn submit(&mut self, value: T, now: Instant) -> Option<T> {
        if self.pending.is_none() && self.interval_elapsed(now) {
            self.last_release = Some(now);
            return Some(value);
        }
        self.pending = Some(value);
        None
    }

    /// Releases the pending value once the interval has elapsed (trailing edge).
    pub fn flush_ready(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.interval_elapsed(now) {
            self.last_release = Some(now);
            return self.pending.take();
        }
        None
    }

    /// When the pending value becomes ready, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_release.map(|at| at + self.interval)
    }

    /// Releases the pending value immediately, ignoring the interval.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
