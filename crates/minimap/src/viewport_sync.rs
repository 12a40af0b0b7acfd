// Subsystem: docs/subsystems/viewport_scroll - Viewport mapping & scroll arithmetic
// Chunk: docs/chunks/minimap_projection - Scroll sync between notebook and minimap
//!
//! Two-way scroll mapping between the main cell column and the minimap.
//!
//! Everything runs through one normalized scroll ratio in `[0, 1]`:
//!
//! - notebook -> minimap: the ratio positions both the track (which scrolls
//!   inside the rail when it is taller than the rail) and the thumb
//! - minimap -> notebook: a click either lands on a row (seek to that cell)
//!   or on empty track (seek proportionally); a thumb drag inverts the thumb
//!   placement back into a ratio
//!
//! All functions are pure; the cell list view stores the last computed
//! [`MinimapViewport`] and feeds it back for clicks and drags.

use lite_notebook_cells::CellId;

use crate::projection::MinimapData;

/// Smallest thumb height, so the thumb stays grabbable in long notebooks
pub const THUMB_MIN_HEIGHT: f32 = 16.0;

/// Seeking to a row leaves this much of the previous cell visible above it
pub const SEEK_TOP_OFFSET: f32 = 8.0;

/// Where the minimap track and thumb sit for one notebook scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinimapViewport {
    /// Normalized scroll position in `[0, 1]`
    pub ratio: f32,
    /// How far the track is scrolled inside the rail
    pub mini_scroll_top: f32,
    /// Thumb top relative to the visible rail
    pub thumb_top: f32,
    /// Displayed thumb height, never taller than the rail
    pub thumb_height: f32,
    /// Thumb height in track space, before the rail cap
    pub track_thumb_height: f32,
}

/// Where the main column should scroll after a minimap interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SeekTarget {
    /// The cell that was clicked, if the click landed on a row
    pub row: Option<CellId>,
    /// Requested scroll offset. Floored at 0; the host clamps the other end.
    pub scroll_top: f32,
}

/// Normalized scroll ratio of the main column.
///
/// Zero when the content fits inside the viewport.
pub fn scroll_ratio(scroll_top: f32, content_height: f32, viewport_height: f32) -> f32 {
    let scrollable = content_height - viewport_height;
    if !(scrollable > 0.0) || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable).clamp(0.0, 1.0)
}

/// Scroll offset of the main column for a normalized ratio.
pub fn scroll_top_for_ratio(ratio: f32, content_height: f32, viewport_height: f32) -> f32 {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    ratio * (content_height - viewport_height).max(0.0)
}

/// Positions the track and thumb for the main column's scroll offset.
pub fn sync_from_notebook(data: &MinimapData, scroll_top: f32, viewport_height: f32) -> MinimapViewport {
    let content = data.notebook_content_height;
    let total = data.total_content_height;
    let rail = data.rail_height;

    let ratio = scroll_ratio(scroll_top, content, viewport_height);
    let mini_scroll_top = ratio * data.max_mini_scroll();

    let visible_fraction = if content > 0.0 {
        (viewport_height / content).max(0.0)
    } else {
        1.0
    };
    let track_thumb_height = (visible_fraction * total).max(THUMB_MIN_HEIGHT).min(total.max(THUMB_MIN_HEIGHT));
    let thumb_height = track_thumb_height.min(rail);

    let thumb_top = (ratio * (total - track_thumb_height) - mini_scroll_top).clamp(0.0, (rail - thumb_height).max(0.0));

    MinimapViewport {
        ratio,
        mini_scroll_top,
        thumb_top,
        thumb_height,
        track_thumb_height,
    }
}

impl MinimapViewport {
    /// Inverts thumb placement back into a scroll ratio.
    ///
    /// Uses the track scroll of this frame; a drag recomputes the viewport
    /// after every move so the error does not accumulate.
    pub fn ratio_from_thumb_top(&self, data: &MinimapData, thumb_top: f32) -> f32 {
        let travel = data.total_content_height - self.track_thumb_height;
        if !(travel > 0.0) || !thumb_top.is_finite() {
            return 0.0;
        }
        ((thumb_top + self.mini_scroll_top) / travel).clamp(0.0, 1.0)
    }

    /// Returns true if the rail offset falls on the thumb.
    pub fn thumb_contains(&self, offset_y: f32) -> bool {
        offset_y >= self.thumb_top && offset_y < self.thumb_top + self.thumb_height
    }

    /// Resolves a click at `offset_y` (relative to the visible rail).
    pub fn resolve_click(&self, data: &MinimapData, offset_y: f32, viewport_height: f32) -> SeekTarget {
        let y = offset_y + self.mini_scroll_top;

        if let Some(row) = data.row_at_track_y(y) {
            return SeekTarget {
                row: Some(row.id.clone()),
                scroll_top: (row.raw_top - SEEK_TOP_OFFSET).max(0.0),
            };
        }

        let total = data.total_content_height;
        let ratio = if total > 0.0 { y / total } else { 0.0 };
        SeekTarget {
            row: None,
            scroll_top: scroll_top_for_ratio(ratio, data.notebook_content_height, viewport_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;
    use crate::row_model::Row;
    use lite_notebook_cells::CellKind;

    fn uniform(count: usize, height: f32, viewport: f32) -> MinimapData {
        uniform_in_rail(count, height, viewport, viewport)
    }

    fn uniform_in_rail(count: usize, height: f32, viewport: f32, minimap_height: f32) -> MinimapData {
        let rows = (0..count)
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
            .collect();
        project(rows, count as f32 * height, viewport, minimap_height)
    }

    // ==================== scroll_ratio ====================

    #[test]
    fn test_ratio_zero_when_content_fits() {
        assert_eq!(scroll_ratio(100.0, 500.0, 800.0), 0.0);
        assert_eq!(scroll_ratio(0.0, 800.0, 800.0), 0.0);
    }

    #[test]
    fn test_ratio_clamped() {
        assert_eq!(scroll_ratio(-50.0, 2000.0, 800.0), 0.0);
        assert_eq!(scroll_ratio(5000.0, 2000.0, 800.0), 1.0);
        assert!((scroll_ratio(600.0, 2000.0, 800.0) - 0.5).abs() < 1e-6);
    }

    // ==================== sync_from_notebook ====================

    #[test]
    fn test_thumb_at_top_and_bottom() {
        let data = uniform(500, 40.0, 800.0);
        let top = sync_from_notebook(&data, 0.0, 800.0);
        assert_eq!(top.thumb_top, 0.0);
        assert_eq!(top.mini_scroll_top, 0.0);

        let bottom = sync_from_notebook(&data, 19_200.0, 800.0);
        assert_eq!(bottom.ratio, 1.0);
        assert!((bottom.mini_scroll_top - data.max_mini_scroll()).abs() < 1e-3);
        assert!(bottom.thumb_top + bottom.thumb_height <= data.rail_height + 1e-3);
    }

    #[test]
    fn test_thumb_min_height() {
        let data = uniform(5_000, 400.0, 800.0);
        let viewport = sync_from_notebook(&data, 0.0, 800.0);
        assert!(viewport.thumb_height >= THUMB_MIN_HEIGHT);
    }

    #[test]
    fn test_thumb_capped_at_rail() {
        // Content shorter than the viewport: thumb covers the whole track
        let data = uniform(3, 100.0, 800.0);
        let viewport = sync_from_notebook(&data, 0.0, 800.0);
        assert!(viewport.thumb_height <= data.rail_height);
        assert_eq!(viewport.thumb_top, 0.0);
    }

    // ==================== ratio_from_thumb_top ====================

    #[test]
    fn test_round_trip_when_track_fits_rail() {
        // 10 x 100px in an 800px viewport under a 1000px minimap: the
        // 809px track is padded up to the 984px rail
        let data = uniform_in_rail(10, 100.0, 800.0, 1000.0);
        assert_eq!(data.total_content_height, data.rail_height);

        for scroll in [0.0_f32, 20.0, 77.0, 150.0, 200.0] {
            let viewport = sync_from_notebook(&data, scroll, 800.0);
            let ratio = viewport.ratio_from_thumb_top(&data, viewport.thumb_top);
            assert!(
                (ratio - viewport.ratio).abs() < 1e-4,
                "scroll {}: {} != {}",
                scroll,
                ratio,
                viewport.ratio
            );
        }
    }

    #[test]
    fn test_ratio_from_thumb_clamped() {
        let data = uniform_in_rail(10, 100.0, 800.0, 1000.0);
        let viewport = sync_from_notebook(&data, 0.0, 800.0);
        assert_eq!(viewport.ratio_from_thumb_top(&data, -100.0), 0.0);
        assert_eq!(viewport.ratio_from_thumb_top(&data, 10_000.0), 1.0);
    }

    // ==================== resolve_click ====================

    #[test]
    fn test_click_on_row_midpoint_targets_row() {
        let data = uniform(50, 40.0, 800.0);
        let viewport = sync_from_notebook(&data, 0.0, 800.0);
        for row in &data.rows {
            let mid = row.top + row.height / 2.0 - viewport.mini_scroll_top;
            let target = viewport.resolve_click(&data, mid, 800.0);
            assert_eq!(target.row.as_ref(), Some(&row.id));
            assert_eq!(target.scroll_top, (row.raw_top - SEEK_TOP_OFFSET).max(0.0));
        }
    }

    #[test]
    fn test_click_on_empty_track_seeks_proportionally() {
        let data = uniform(3, 100.0, 800.0);
        let viewport = sync_from_notebook(&data, 0.0, 800.0);
        let target = viewport.resolve_click(&data, data.rail_height - 1.0, 800.0);
        assert_eq!(target.row, None);
        // Content fits: nothing to scroll
        assert_eq!(target.scroll_top, 0.0);
    }

    #[test]
    fn test_click_accounts_for_track_scroll() {
        let data = uniform(500, 40.0, 800.0);
        let viewport = sync_from_notebook(&data, 19_200.0, 800.0);
        assert!(viewport.mini_scroll_top > 0.0);

        let target = viewport.resolve_click(&data, data.rail_height - 1.0, 800.0);
        assert_eq!(target.row.as_ref(), Some(&CellId::new("c499")));
    }
}
