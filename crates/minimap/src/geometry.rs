// Subsystem: docs/subsystems/viewport_scroll - Viewport mapping & scroll arithmetic
// Chunk: docs/chunks/minimap_geometry - Layout-first row geometry with gap repair
//!
//! Resolves each row's real top and height in document pixels.
//!
//! Layout is treated as an oracle: whatever the host actually laid out is the
//! truth, and this module never tries to model the layout engine. For each
//! row, in order of preference:
//!
//! 1. the measured box from the [`LayoutOracle`] (element mounted)
//! 2. the last measured height from the [`HeightCache`]
//! 3. the placeholder minimum height
//!
//! Measured heights of hydrated rows are written back into the cache so the
//! placeholder that replaces them (or the estimate used before they mount
//! again) matches.
//!
//! After the per-row pass a forward repair pass closes gaps: if the next row
//! starts further down than this row's bottom, this row's height grows to
//! meet it. Summed row heights therefore never under-count the real
//! document height, which would make the minimap track shorter than the
//! scrollable area and break the scroll-ratio mapping.

use std::collections::HashMap;

use lite_notebook_cells::{CellId, CellSource};

use crate::height_cache::HeightCache;
use crate::hydration::HydratedSet;
use crate::row_model::Row;

/// A laid-out cell element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    /// Top relative to the start of the scroll content (scroll offset included)
    pub top: f32,
    /// Rendered height in pixels
    pub height: f32,
}

impl CellBox {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    fn is_valid(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height >= 0.0
    }
}

/// Source of truth for real layout.
///
/// In a browser host this queries the DOM element tagged with the cell id;
/// natively it is whatever layout pass positioned the cell views.
pub trait LayoutOracle {
    /// The laid-out box of the element for `id`, or `None` if not mounted.
    fn measure(&self, id: &CellId) -> Option<CellBox>;

    /// Total scrollable content height, if the host knows it.
    fn content_height(&self) -> Option<f32> {
        None
    }
}

impl<T: LayoutOracle + ?Sized> LayoutOracle for &T {
    fn measure(&self, id: &CellId) -> Option<CellBox> {
        (**self).measure(id)
    }

    fn content_height(&self) -> Option<f32> {
        (**self).content_height()
    }
}

/// Summary of a geometry pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGeometry {
    /// Raw total document height used for ratio math
    pub content_height: f32,
    /// Number of rows that had a live measurement
    pub measured: usize,
    /// Whether any cached height changed
    pub cache_changed: bool,
}

/// Resolves raw geometry for `rows` in place.
pub fn resolve_geometry<O: LayoutOracle + ?Sized>(
    rows: &mut [Row],
    oracle: &O,
    cache: &mut HeightCache,
    hydrated: &HydratedSet,
    placeholder_min: f32,
) -> ResolvedGeometry {
    let mut next_top = 0.0_f32;
    let mut measured = 0;
    let mut cache_changed = false;

    for row in rows.iter_mut() {
        match oracle.measure(&row.id).filter(CellBox::is_valid) {
            Some(cell_box) => {
                measured += 1;
                row.raw_top = cell_box.top;
                row.raw_height = cell_box.height.max(1.0);
                if hydrated.contains(&row.id) {
                    cache_changed |= cache.record(&row.id, cell_box.height);
                }
            }
            None => {
                row.raw_top = next_top;
                row.raw_height = cache.height_or(&row.id, placeholder_min).max(1.0);
            }
        }
        next_top = row.raw_bottom();
    }

    repair_gaps(rows);

    let rows_bottom = rows.last().map(Row::raw_bottom).unwrap_or(0.0);
    let content_height = oracle
        .content_height()
        .filter(|h| h.is_finite())
        .map_or(rows_bottom, |h| h.max(rows_bottom));

    ResolvedGeometry {
        content_height,
        measured,
        cache_changed,
    }
}

/// Folds the gap between consecutive rows into the earlier row's height.
pub fn repair_gaps(rows: &mut [Row]) {
    for i in 1..rows.len() {
        let gap = rows[i].raw_top - rows[i - 1].raw_top;
        let earlier = &mut rows[i - 1];
        if gap > earlier.raw_height {
            earlier.raw_height = gap;
        }
        earlier.raw_height = earlier.raw_height.max(1.0);
    }
    if let Some(last) = rows.last_mut() {
        last.raw_height = last.raw_height.max(1.0);
    }
}

// =============================================================================
// StaticLayout
// =============================================================================

/// A fixed layout: every cell at a known box.
///
/// Used by the probe binary (heights estimated from line counts) and by tests
/// that need a deterministic oracle.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    boxes: HashMap<CellId, CellBox>,
    content_height: Option<f32>,
}

/// Height of one source line when estimating layout.
pub const ESTIMATED_LINE_HEIGHT: f32 = 18.0;

/// Vertical chrome (padding, prompt, borders) per estimated cell.
pub const ESTIMATED_CELL_CHROME: f32 = 24.0;

/// Extra height estimated for a cell with output.
pub const ESTIMATED_OUTPUT_HEIGHT: f32 = 120.0;

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stacks cells top to bottom with the given heights.
    pub fn stacked<I, K>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<CellId>,
    {
        let mut layout = Self::new();
        let mut top = 0.0;
        for (id, height) in cells {
            layout.boxes.insert(id.into(), CellBox::new(top, height));
            top += height;
        }
        layout.content_height = Some(top);
        layout
    }

    /// Estimates a stacked layout from cell contents.
    pub fn estimate<S: CellSource + ?Sized>(source: &S) -> Self {
        let heights = source.cell_ids().iter().filter_map(|id| {
            let cell = source.cell(id)?;
            let lines = cell.input.as_deref().map_or(1, |text| text.lines().count().max(1));
            let mut height = ESTIMATED_CELL_CHROME + lines as f32 * ESTIMATED_LINE_HEIGHT;
            if cell.has_output() {
                height += ESTIMATED_OUTPUT_HEIGHT;
            }
            Some((id.clone(), height))
        });
        Self::stacked(heights)
    }

    /// Places (or moves) one cell.
    pub fn set_box(&mut self, id: impl Into<CellId>, cell_box: CellBox) {
        self.boxes.insert(id.into(), cell_box);
    }

    /// Unmounts one cell.
    pub fn remove(&mut self, id: &CellId) {
        self.boxes.remove(id);
    }

    pub fn set_content_height(&mut self, height: Option<f32>) {
        self.content_height = height;
    }
}

impl LayoutOracle for StaticLayout {
    fn measure(&self, id: &CellId) -> Option<CellBox> {
        self.boxes.get(id).copied()
    }

    fn content_height(&self) -> Option<f32> {
        self.content_height
    }
}
