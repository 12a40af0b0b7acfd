// Subsystem: docs/subsystems/viewport_scroll - Viewport mapping & scroll arithmetic
// Chunk: docs/chunks/minimap_projection - Minimap geometry and scale projection
//!
//! Projects raw document geometry onto the minimap track.
//!
//! One scale factor is applied to every row. It is chosen so that:
//!
//! - a short notebook still gets a track at least as tall as the viewport
//!   (scaled by `VIEWPORT_MULTIPLIER`), keeping clicks precise
//! - a huge notebook never produces a track taller than `TRACK_CEILING`,
//!   which bounds canvas memory and draw cost
//! - otherwise `DEFAULT_SCALE` applies
//!
//! The baseline is clamped into `[min_for_viewport, max_for_track]` (the
//! ceiling wins when those cross) and then into `[MIN_SCALE, MAX_SCALE]`.
//! Both bounds shrink as the document grows, so the chosen scale never
//! increases with document size.
//!
//! The ceiling bound is computed against the track space left after the
//! per-row gaps. Row floors can still push a very long notebook past the
//! ceiling; `project` then compresses the whole track uniformly so every row
//! stays on it.

use crate::row_model::Row;

// =============================================================================
// Projection Constants
// =============================================================================

/// Scale used when neither bound applies
pub const DEFAULT_SCALE: f32 = 0.1;

/// Absolute lower bound on the scale
pub const MIN_SCALE: f32 = 0.01;

/// Absolute upper bound on the scale
pub const MAX_SCALE: f32 = 1.0;

/// Track must be at least `viewport_height * VIEWPORT_MULTIPLIER` tall
pub const VIEWPORT_MULTIPLIER: f32 = 1.0;

/// Absolute maximum track height in pixels
pub const TRACK_CEILING: f32 = 30_000.0;

/// Smallest scaled row height, so short cells stay visible and clickable
pub const MIN_ROW_HEIGHT: f32 = 2.0;

/// Gap between scaled rows
pub const ROW_GAP: f32 = 1.0;

/// Space taken by minimap chrome (header, padding) above and below the rail
pub const RAIL_CHROME_MARGIN: f32 = 16.0;

/// Smallest visible rail height
pub const MIN_RAIL_HEIGHT: f32 = 180.0;

// =============================================================================
// MinimapData
// =============================================================================

/// One computed minimap frame.
///
/// Consumed by the renderer and the viewport sync controller. Treated as
/// immutable between recomputes.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapData {
    /// Visible minimap height in pixels
    pub rail_height: f32,
    /// Scaled track height, `rail_height <= total_content_height <= TRACK_CEILING`
    pub total_content_height: f32,
    /// Raw document height used for ratio math
    pub notebook_content_height: f32,
    /// The scale that produced the track geometry
    pub scale: f32,
    pub rows: Vec<Row>,
}

impl MinimapData {
    /// How far the track can scroll inside the rail.
    pub fn max_mini_scroll(&self) -> f32 {
        (self.total_content_height - self.rail_height).max(0.0)
    }

    /// The row whose scaled span contains track-space `y`.
    ///
    /// Rows are ordered by `top`, so this is a binary search. Returns `None`
    /// for the gaps between rows and the padding below the last row.
    pub fn row_at_track_y(&self, y: f32) -> Option<&Row> {
        let idx = self.rows.partition_point(|row| row.top <= y);
        let row = self.rows.get(idx.checked_sub(1)?)?;
        row.contains_track_y(y).then_some(row)
    }

    /// Index of the row with the given id.
    pub fn index_of(&self, id: &lite_notebook_cells::CellId) -> Option<usize> {
        self.rows.iter().position(|row| &row.id == id)
    }
}

/// Chooses the track scale for a document of `raw_total` pixels.
pub fn choose_scale(raw_total: f32, viewport_height: f32) -> f32 {
    scale_within(raw_total, viewport_height, TRACK_CEILING)
}

/// Track space left for row bodies once the gaps between `row_count` rows
/// are taken out of the ceiling.
pub fn row_budget(row_count: usize) -> f32 {
    let gaps = row_count.saturating_sub(1) as f32 * ROW_GAP;
    (TRACK_CEILING - gaps).max(0.0)
}

fn scale_within(raw_total: f32, viewport_height: f32, ceiling: f32) -> f32 {
    if !raw_total.is_finite() || raw_total <= 0.0 {
        return DEFAULT_SCALE;
    }
    let viewport_height = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };

    let min_for_viewport = viewport_height * VIEWPORT_MULTIPLIER / raw_total;
    let max_for_track = ceiling / raw_total;

    // When the bounds cross, the ceiling wins.
    let bounded = DEFAULT_SCALE.max(min_for_viewport).min(max_for_track);
    bounded.clamp(MIN_SCALE, MAX_SCALE)
}

/// Visible rail height for a minimap of the given outer height.
pub fn rail_height(visible_minimap_height: f32) -> f32 {
    let available = if visible_minimap_height.is_finite() {
        visible_minimap_height - RAIL_CHROME_MARGIN
    } else {
        0.0
    };
    available.max(MIN_RAIL_HEIGHT)
}

/// Projects rows with resolved raw geometry onto the track.
///
/// Every row ends at or above `total_content_height`.
pub fn project(
    mut rows: Vec<Row>,
    notebook_content_height: f32,
    viewport_height: f32,
    visible_minimap_height: f32,
) -> MinimapData {
    let mut scale = scale_within(notebook_content_height, viewport_height, row_budget(rows.len()));
    let rail_height = rail_height(visible_minimap_height);

    let mut cursor = stack(&mut rows, |row| (row.raw_height * scale).max(MIN_ROW_HEIGHT), ROW_GAP);

    if cursor > TRACK_CEILING {
        let factor = TRACK_CEILING / cursor;
        tracing::debug!(rows = rows.len(), factor, "compressing minimap track under ceiling");
        cursor = stack(&mut rows, |row| row.height * factor, ROW_GAP * factor);
        // Absorb rounding so the last row ends exactly on the ceiling
        if let Some(last) = rows.last_mut() {
            last.height = last.height.min(TRACK_CEILING - last.top);
            cursor = cursor.min(TRACK_CEILING);
        }
        scale *= factor;
    }

    let total_content_height = cursor.max(rail_height).min(TRACK_CEILING);

    MinimapData {
        rail_height,
        total_content_height,
        notebook_content_height: notebook_content_height.max(0.0),
        scale,
        rows,
    }
}

/// Lays rows out top to bottom with `gap` between them and returns the
/// bottom of the last one.
fn stack(rows: &mut [Row], height_of: impl Fn(&Row) -> f32, gap: f32) -> f32 {
    let mut cursor = 0.0_f32;
    for (i, row) in rows.iter_mut().enumerate() {
        if i > 0 {
            cursor += gap;
        }
        row.top = cursor;
        row.height = height_of(row);
        cursor += row.height;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use lite_notebook_cells::{CellId, CellKind};

    fn uniform_rows(count: usize, height: f32) -> Vec<Row> {
        (0..count)
            .map(|i| Row {
                id: CellId::new(format!("c{}", i)),
                kind: CellKind::Code,
                is_current: false,
                has_output: false,
                preview_lines: Vec::new(),
                raw_top: i as f32 * height,
                raw_height: height,
                top: 0.0,
                height: 0.0,
            })
            .collect()
    }

    // ==================== choose_scale ====================

    #[test]
    fn test_default_scale_when_unbounded() {
        // 20000px document, 800px viewport: min 0.04, max 1.5
        assert!((choose_scale(20_000.0, 800.0) - DEFAULT_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_short_document_scales_up_to_viewport() {
        // 1000px document, 800px viewport: at least 0.8
        assert!((choose_scale(1_000.0, 800.0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_huge_document_capped_by_ceiling() {
        let raw = 10_000_000.0;
        let scale = choose_scale(raw, 800.0);
        assert!(raw * scale <= TRACK_CEILING + 1e-3 || scale == MIN_SCALE);
    }

    #[test]
    fn test_scale_non_increasing_in_document_size() {
        for viewport in [0.0_f32, 300.0, 800.0, 2000.0] {
            let mut previous = f32::INFINITY;
            let mut raw = 10.0_f32;
            while raw < 1e8 {
                let scale = choose_scale(raw, viewport);
                assert!(
                    scale <= previous + 1e-7,
                    "scale rose from {} to {} at raw {} viewport {}",
                    previous,
                    scale,
                    raw,
                    viewport
                );
                previous = scale;
                raw *= 1.37;
            }
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(choose_scale(0.0, 800.0), DEFAULT_SCALE);
        assert_eq!(choose_scale(f32::NAN, 800.0), DEFAULT_SCALE);
        assert!(choose_scale(1000.0, f32::INFINITY) <= MAX_SCALE);
    }

    // ==================== rail_height ====================

    #[test]
    fn test_rail_height_floor() {
        assert_eq!(rail_height(800.0), 784.0);
        assert_eq!(rail_height(100.0), MIN_RAIL_HEIGHT);
    }

    // ==================== project ====================

    #[test]
    fn test_rows_stack_with_gap() {
        let data = project(uniform_rows(3, 100.0), 300.0, 800.0, 800.0);
        let scale = data.scale;
        assert!((data.rows[0].height - 100.0 * scale).abs() < 1e-4);
        assert!((data.rows[1].top - (100.0 * scale + ROW_GAP)).abs() < 1e-4);
    }

    #[test]
    fn test_min_row_height() {
        let data = project(uniform_rows(10, 1.0), 20_000.0, 800.0, 800.0);
        assert!(data.rows.iter().all(|r| r.height >= MIN_ROW_HEIGHT));
    }

    #[test]
    fn test_total_at_least_rail() {
        let data = project(uniform_rows(2, 10.0), 20.0, 800.0, 800.0);
        assert_eq!(data.total_content_height, data.rail_height);
    }

    #[test]
    fn test_total_never_exceeds_ceiling() {
        for count in [1usize, 100, 5_000, 50_000] {
            let data = project(uniform_rows(count, 400.0), count as f32 * 400.0, 800.0, 800.0);
            assert!(data.total_content_height <= TRACK_CEILING);
        }
    }

    #[test]
    fn test_gaps_leave_room_under_ceiling() {
        // 20000 rows of 100px: 19999px of gaps leave 10001px for bodies
        let count = 20_000;
        let data = project(uniform_rows(count, 100.0), count as f32 * 100.0, 800.0, 800.0);
        assert!(data.scale * count as f32 * 100.0 <= row_budget(count) + 1e-2);
        assert!(data.rows.last().unwrap().bottom() <= data.total_content_height);
    }

    #[test]
    fn test_long_notebook_compressed_onto_track() {
        for count in [10_001usize, 12_000, 50_000] {
            let data = project(uniform_rows(count, 40.0), count as f32 * 40.0, 800.0, 800.0);
            assert_eq!(data.total_content_height, TRACK_CEILING);
            for pair in data.rows.windows(2) {
                assert!(pair[0].bottom() <= pair[1].top, "rows overlap at {}", pair[1].id);
            }
            let last = data.rows.last().unwrap();
            assert!(last.bottom() <= data.total_content_height);
            assert!(last.height > 0.0);
            assert_eq!(data.row_at_track_y(TRACK_CEILING - last.height / 2.0).map(|r| &r.id), Some(&last.id));
        }
    }

    #[test]
    fn test_row_at_track_y_midpoints() {
        let data = project(uniform_rows(50, 40.0), 2_000.0, 800.0, 800.0);
        for row in &data.rows {
            let mid = row.top + row.height / 2.0;
            assert_eq!(data.row_at_track_y(mid).map(|r| &r.id), Some(&row.id));
        }
    }

    #[test]
    fn test_row_at_track_y_gap_and_padding() {
        let data = project(uniform_rows(3, 100.0), 300.0, 800.0, 800.0);
        let gap_y = data.rows[0].bottom() + ROW_GAP / 2.0;
        assert!(data.row_at_track_y(gap_y).is_none());
        assert!(data.row_at_track_y(data.total_content_height - 1.0).is_none());
        assert!(data.row_at_track_y(-5.0).is_none());
    }
}
