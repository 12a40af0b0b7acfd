// Chunk: docs/chunks/lazy_hydration - Lazy cell hydration
//!
//! Decides which cells are mounted with real content.
//!
//! Hydration is grow-only within a list session. A cell that has been
//! rendered once stays rendered after it scrolls out of view, so scrolling
//! back never re-pays the mount cost and its measured height stays live.
//! Placeholders are used only for cells that have never been near the
//! viewport.
//!
//! Triggers:
//! - mount: the first `INITIAL_WINDOW` cells plus the focused cells
//! - scroll and resize: every placeholder within `OVERSCAN` of the viewport
//! - post-mount timers: the same viewport expansion, repeated a few times
//!   while the host's first layouts settle
//!
//! The set is cleared only by [`HydrationController::reset`], when the list
//! identity changes.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::trace;

use lite_notebook_cells::{CellId, CellSource};

use crate::row_model::Row;

/// Cells hydrated unconditionally at mount
pub const INITIAL_WINDOW: usize = 20;

/// Distance above and below the viewport within which placeholders hydrate
pub const OVERSCAN: f32 = 1000.0;

/// Delays after mount at which the viewport expansion re-runs
pub const POST_MOUNT_DELAYS_MS: [u64; 3] = [60, 300, 1200];

/// The ids currently mounted with real content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydratedSet {
    ids: HashSet<CellId>,
}

impl HydratedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id. Returns true if it was not already hydrated.
    pub fn insert(&mut self, id: CellId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CellId> {
        self.ids.iter()
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Owns the hydrated set and the post-mount timers.
#[derive(Debug, Default)]
pub struct HydrationController {
    hydrated: HydratedSet,
    /// Pending post-mount expansion deadlines, ascending
    timers: Vec<Instant>,
}

impl HydrationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hydrated(&self) -> &HydratedSet {
        &self.hydrated
    }

    /// Hydrates the initial window and focused cells, and arms the
    /// post-mount timers. Returns the number of newly hydrated cells.
    pub fn mount<'a, S, I>(&mut self, source: &S, focus: I, now: Instant) -> usize
    where
        S: CellSource + ?Sized,
        I: IntoIterator<Item = &'a CellId>,
    {
        let mut added = 0;
        for id in source.cell_ids().iter().take(INITIAL_WINDOW) {
            added += usize::from(self.hydrated.insert(id.clone()));
        }
        for id in focus {
            if source.cell(id).is_some() {
                added += usize::from(self.hydrated.insert(id.clone()));
            }
        }

        self.timers = POST_MOUNT_DELAYS_MS
            .iter()
            .map(|delay| now + Duration::from_millis(*delay))
            .collect();

        trace!(added, total = self.hydrated.len(), "hydrated initial window");
        added
    }

    /// Hydrates one cell, e.g. when it becomes current or is edited.
    pub fn hydrate(&mut self, id: &CellId) -> bool {
        self.hydrated.insert(id.clone())
    }

    /// Hydrates every placeholder row whose raw span intersects the
    /// overscanned viewport. Returns the number of newly hydrated cells.
    pub fn expand_for_viewport(&mut self, rows: &[Row], scroll_top: f32, viewport_height: f32) -> usize {
        let scroll_top = if scroll_top.is_finite() { scroll_top } else { 0.0 };
        let viewport_height = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };
        let low = scroll_top - OVERSCAN;
        let high = scroll_top + viewport_height + OVERSCAN;

        let mut added = 0;
        for row in rows {
            if row.raw_top <= high && row.raw_bottom() >= low && !self.hydrated.contains(&row.id) {
                self.hydrated.insert(row.id.clone());
                added += 1;
            }
        }

        if added > 0 {
            trace!(added, total = self.hydrated.len(), scroll_top, "hydrated near viewport");
        }
        added
    }

    /// Consumes the post-mount timers that are due. Returns how many fired.
    pub fn due_timers(&mut self, now: Instant) -> usize {
        let due = self.timers.partition_point(|deadline| *deadline <= now);
        self.timers.drain(..due);
        due
    }

    /// The next post-mount timer deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.first().copied()
    }

    pub fn cancel_timers(&mut self) {
        self.timers.clear();
    }

    /// Forgets every hydrated cell and pending timer.
    pub fn reset(&mut self) {
        self.hydrated.clear();
        self.timers.clear();
    }
}
