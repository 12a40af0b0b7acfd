// Chunk: docs/chunks/minimap_rows - Row model for the minimap
//!
//! Builds the minimap's per-cell rows from the notebook.
//!
//! A [`Row`] carries everything the projection and renderer need about one
//! cell: what kind it is, whether it is current, whether it has output, a
//! bounded set of preview lines, and its geometry in two coordinate spaces
//! (raw document pixels and scaled track pixels). Rows are rebuilt on every
//! recompute; nothing holds on to them between frames.

use lite_notebook_cells::{CellId, CellKind, CellSource};

use crate::height_cache::HeightCache;

/// Maximum preview lines extracted per cell.
///
/// Bounds the worst case for pathologically long cells; the renderer can
/// only fit a handful of lines per row anyway.
pub const MAX_PREVIEW_LINES: usize = 48;

/// Replacement for a tab character in preview text.
pub const TAB_EXPANSION: &str = "  ";

/// Height assumed for a cell that has never been measured.
pub const PLACEHOLDER_MIN_HEIGHT: f32 = 56.0;

/// One cell's presentation record for the minimap.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: CellId,
    pub kind: CellKind,
    pub is_current: bool,
    pub has_output: bool,
    pub preview_lines: Vec<String>,
    /// Top in document pixels
    pub raw_top: f32,
    /// Height in document pixels, always >= 1
    pub raw_height: f32,
    /// Top in track pixels
    pub top: f32,
    /// Height in track pixels
    pub height: f32,
}

impl Row {
    pub fn raw_bottom(&self) -> f32 {
        self.raw_top + self.raw_height
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Returns true if the track-space `y` falls inside this row's span.
    pub fn contains_track_y(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom()
    }
}

/// Extracts preview lines from a cell's input.
///
/// Splits on line boundaries, expands tabs, and keeps at most
/// `MAX_PREVIEW_LINES` lines. A cell with no input but some output gets a
/// single blank line so its row is not visually empty.
pub fn preview_lines(input: Option<&str>, has_output: bool) -> Vec<String> {
    match input {
        Some(text) if !text.is_empty() => text
            .lines()
            .take(MAX_PREVIEW_LINES)
            .map(|line| line.replace('\t', TAB_EXPANSION))
            .collect(),
        _ if has_output => vec![String::new()],
        _ => Vec::new(),
    }
}

/// Builds one row per cell that has a record, in document order.
///
/// Geometry is initialized from the height cache (falling back to
/// `placeholder_min`) with rows stacked top to bottom; the geometry resolver
/// refines it against live layout. Ids without a record are skipped.
pub fn build_rows<S: CellSource>(
    source: &S,
    current: Option<&CellId>,
    cache: &HeightCache,
    placeholder_min: f32,
) -> Vec<Row> {
    let ids = source.cell_ids();
    let mut rows = Vec::with_capacity(ids.len());
    let mut raw_top = 0.0;

    for id in ids {
        let Some(cell) = source.cell(id) else {
            continue;
        };
        let has_output = cell.has_output();
        let raw_height = cache.height_or(id, placeholder_min).max(1.0);

        rows.push(Row {
            id: id.clone(),
            kind: cell.kind,
            is_current: current == Some(id),
            has_output,
            preview_lines: preview_lines(cell.input.as_deref(), has_output),
            raw_top,
            raw_height,
            top: 0.0,
            height: 0.0,
        });
        raw_top += raw_height;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use lite_notebook_cells::{CellRecord, Notebook};

    // ==================== preview_lines ====================

    #[test]
    fn test_preview_splits_lines() {
        let lines = preview_lines(Some("a = 1\r\nb = 2\nc = 3"), false);
        assert_eq!(lines, vec!["a = 1", "b = 2", "c = 3"]);
    }

    #[test]
    fn test_preview_expands_tabs() {
        let lines = preview_lines(Some("if x:\n\treturn 1"), false);
        assert_eq!(lines[1], "  return 1");
    }

    #[test]
    fn test_preview_truncates() {
        let source: String = (0..500).map(|i| format!("line {}\n", i)).collect();
        let lines = preview_lines(Some(&source), false);
        assert_eq!(lines.len(), MAX_PREVIEW_LINES);
        assert_eq!(lines[0], "line 0");
    }

    #[test]
    fn test_preview_output_only_cell() {
        assert_eq!(preview_lines(None, true), vec![String::new()]);
        assert_eq!(preview_lines(Some(""), true), vec![String::new()]);
        assert!(preview_lines(None, false).is_empty());
    }

    // ==================== build_rows ====================

    fn sample_notebook() -> Notebook {
        Notebook::from_cells(
            "nb",
            vec![
                CellRecord::markdown("intro", "# Title"),
                CellRecord::code("load", "df = load()").with_output(2),
                CellRecord::code("plot", "plot(df)"),
            ],
        )
    }

    #[test]
    fn test_one_row_per_cell_in_order() {
        let notebook = sample_notebook();
        let rows = build_rows(&notebook, None, &HeightCache::new(), PLACEHOLDER_MIN_HEIGHT);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "load", "plot"]);
        assert_eq!(rows[0].kind, CellKind::Markdown);
        assert!(rows[1].has_output);
        assert!(!rows[2].has_output);
    }

    /// A source whose order lists an id the document no longer has.
    struct StaleOrder {
        notebook: Notebook,
        ids: Vec<CellId>,
    }

    impl CellSource for StaleOrder {
        fn identity(&self) -> &str {
            self.notebook.identity()
        }

        fn cell_ids(&self) -> &[CellId] {
            &self.ids
        }

        fn cell(&self, id: &CellId) -> Option<&CellRecord> {
            self.notebook.cell(id)
        }
    }

    #[test]
    fn test_ids_without_record_are_skipped() {
        let notebook = sample_notebook();
        let mut ids = notebook.cell_ids().to_vec();
        ids.insert(1, CellId::new("ghost"));
        let source = StaleOrder { notebook, ids };
        let rows = build_rows(&source, None, &HeightCache::new(), PLACEHOLDER_MIN_HEIGHT);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "load", "plot"]);
    }

    #[test]
    fn test_current_flag() {
        let notebook = sample_notebook();
        let current = CellId::new("load");
        let rows = build_rows(&notebook, Some(&current), &HeightCache::new(), PLACEHOLDER_MIN_HEIGHT);
        let flags: Vec<bool> = rows.iter().map(|r| r.is_current).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_initial_geometry_uses_cache_then_placeholder() {
        let notebook = sample_notebook();
        let mut cache = HeightCache::new();
        cache.record(&CellId::new("load"), 200.0);
        let rows = build_rows(&notebook, None, &cache, 50.0);

        assert_eq!(rows[0].raw_height, 50.0);
        assert_eq!(rows[1].raw_height, 200.0);
        assert_eq!(rows[1].raw_top, 50.0);
        assert_eq!(rows[2].raw_top, 250.0);
    }
}
