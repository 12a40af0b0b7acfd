// Chunk: docs/chunks/lazy_hydration - Measured height cache
//!
//! Last-measured real heights of hydrated cells.
//!
//! A placeholder renders at the cached height of its cell so that swapping
//! between placeholder and real content does not shift the scroll position.
//! Entries live for the whole list instance and are never deleted; an entry
//! for a removed cell is simply never looked up again.

use std::collections::HashMap;

use lite_notebook_cells::CellId;

/// Map from cell id to last measured height in pixels.
#[derive(Debug, Clone, Default)]
pub struct HeightCache {
    heights: HashMap<CellId, f32>,
}

impl HeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached height for `id`, if it was ever measured.
    pub fn get(&self, id: &CellId) -> Option<f32> {
        self.heights.get(id).copied()
    }

    /// Returns the cached height, or `fallback` for unmeasured cells.
    pub fn height_or(&self, id: &CellId, fallback: f32) -> f32 {
        self.get(id).unwrap_or(fallback)
    }

    /// Records a measurement.
    ///
    /// Non-finite and non-positive heights are ignored (an element measured
    /// mid-teardown reports zero). Returns `true` if the stored value changed.
    pub fn record(&mut self, id: &CellId, height: f32) -> bool {
        if !height.is_finite() || height <= 0.0 {
            return false;
        }
        match self.heights.get_mut(id) {
            Some(existing) if (*existing - height).abs() < 0.5 => false,
            Some(existing) => {
                *existing = height;
                true
            }
            None => {
                self.heights.insert(id.clone(), height);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
