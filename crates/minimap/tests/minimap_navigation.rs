// Chunk: docs/chunks/minimap_projection - Integration test for minimap navigation
//!
//! End-to-end tests of the mount -> scroll -> click pipeline on a large,
//! uniformly laid out notebook.

use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lite_notebook::projection::{MIN_RAIL_HEIGHT, TRACK_CEILING};
use lite_notebook::viewport_sync::SEEK_TOP_OFFSET;
use lite_notebook::{
    CellListView, DisplayList, ListViewOptions, MemoryStorage, SettingsBus, StaticLayout,
};
use lite_notebook_cells::{CellId, CellRecord, Notebook};
use lite_notebook_input::{ListEvent, MinimapPointerEvent, ScrollEvent, ViewportSize};

const CELL_COUNT: usize = 500;
const CELL_HEIGHT: f32 = 40.0;
const VIEWPORT_HEIGHT: f32 = 800.0;

type View = CellListView<Notebook, StaticLayout, Rc<MemoryStorage>>;

fn large_view() -> View {
    view_with_cells(CELL_COUNT)
}

fn view_with_cells(count: usize) -> View {
    let notebook = Notebook::from_cells(
        "large.ipynb",
        (0..count).map(|i| CellRecord::code(format!("cell-{}", i), format!("value_{} = {}", i, i))),
    );
    let layout = StaticLayout::stacked((0..count).map(|i| (format!("cell-{}", i), CELL_HEIGHT)));
    CellListView::new(
        notebook,
        layout,
        Rc::new(MemoryStorage::new()),
        Arc::new(SettingsBus::new()),
        ListViewOptions::default(),
    )
}

fn viewport() -> ViewportSize {
    ViewportSize::new(1280.0, VIEWPORT_HEIGHT)
}

#[test]
fn test_large_notebook_track_bounds() {
    let mut view = large_view();
    view.mount(viewport(), Instant::now());

    let data = view.minimap_data().unwrap();
    assert_eq!(data.notebook_content_height, CELL_COUNT as f32 * CELL_HEIGHT);
    assert!(data.total_content_height <= TRACK_CEILING);
    assert!(data.rail_height >= MIN_RAIL_HEIGHT);
    assert!(data.total_content_height >= data.rail_height);
}

#[test]
fn test_click_near_rail_bottom_at_end_targets_last_cell() {
    let mut view = large_view();
    let now = Instant::now();
    view.mount(viewport(), now);

    let max_scroll = CELL_COUNT as f32 * CELL_HEIGHT - VIEWPORT_HEIGHT;
    view.on_scroll(ScrollEvent::new(max_scroll), now);

    let rail_height = view.minimap_data().unwrap().rail_height;
    let target = view.on_minimap_click(rail_height - 1.0, now).unwrap();

    let last_top = (CELL_COUNT - 1) as f32 * CELL_HEIGHT;
    assert_eq!(target.row, Some(CellId::new(format!("cell-{}", CELL_COUNT - 1))));
    assert!(
        (target.scroll_top - last_top).abs() <= CELL_HEIGHT,
        "seek to {} is not within one cell of {}",
        target.scroll_top,
        last_top
    );
}

#[test]
fn test_very_long_notebook_keeps_every_row_on_track() {
    let count = 12_000;
    let mut view = view_with_cells(count);
    let now = Instant::now();
    view.mount(viewport(), now);

    let data = view.minimap_data().unwrap();
    assert_eq!(data.rows.len(), count);
    assert!(data.total_content_height <= TRACK_CEILING);
    for row in &data.rows {
        assert!(
            row.bottom() <= data.total_content_height,
            "{} ends at {} past the track end {}",
            row.id,
            row.bottom(),
            data.total_content_height
        );
    }

    let max_scroll = count as f32 * CELL_HEIGHT - VIEWPORT_HEIGHT;
    view.on_scroll(ScrollEvent::new(max_scroll), now);
    let rail_height = view.minimap_data().unwrap().rail_height;
    let target = view.on_minimap_click(rail_height - 1.0, now).unwrap();
    assert_eq!(target.row, Some(CellId::new(format!("cell-{}", count - 1))));
}

#[test]
fn test_click_every_row_midpoint() {
    let mut view = large_view();
    let now = Instant::now();
    view.mount(viewport(), now);

    let rows: Vec<_> = view
        .minimap_data()
        .unwrap()
        .rows
        .iter()
        .map(|r| (r.id.clone(), r.top, r.height, r.raw_top))
        .collect();
    for (id, top, height, raw_top) in rows.into_iter().step_by(37) {
        // Scroll the track so the row is on the rail, then click its middle
        let mini_scroll = view.minimap_viewport().mini_scroll_top;
        let target = view.on_minimap_click(top + height / 2.0 - mini_scroll, now).unwrap();
        assert_eq!(target.row.as_ref(), Some(&id));
        assert_eq!(target.scroll_top, (raw_top - SEEK_TOP_OFFSET).max(0.0));
    }
}

#[test]
fn test_scroll_sequence_only_grows_hydration() {
    let mut view = large_view();
    let mut now = Instant::now();
    view.mount(viewport(), now);

    let mut previous = view.hydrated().len();
    let positions = [0.0, 5_000.0, 1_200.0, 19_200.0, 300.0, 12_345.0, 0.0, 8_000.0];
    for (i, scroll) in positions.iter().enumerate() {
        now += Duration::from_millis(16);
        view.handle_event(ListEvent::Scroll(ScrollEvent::new(*scroll)), now);
        if i % 3 == 0 {
            let height = 400.0 + i as f32 * 150.0;
            view.handle_event(ListEvent::Resize(ViewportSize::new(1280.0, height)), now);
        }
        let size = view.hydrated().len();
        assert!(size >= previous, "hydration shrank from {} to {}", previous, size);
        previous = size;
    }
    assert!(previous < CELL_COUNT);
}

#[test]
fn test_pointer_events_through_handle_event() {
    let mut view = large_view();
    let now = Instant::now();
    view.mount(viewport(), now);

    // Press well below the thumb: a seek, not a drag
    let thumb = view.minimap_viewport();
    let offset = thumb.thumb_top + thumb.thumb_height + 200.0;
    let target = view
        .handle_event(ListEvent::Minimap(MinimapPointerEvent::down(offset)), now)
        .unwrap();
    assert!(target.scroll_top > 0.0);
    assert_eq!(view.scroll_top(), target.scroll_top);
    view.handle_event(ListEvent::Minimap(MinimapPointerEvent::up(offset)), now);
}

#[test]
fn test_paint_after_mount_and_not_after_scroll() {
    let mut view = large_view();
    let now = Instant::now();
    view.mount(viewport(), now);

    let mut canvas = DisplayList::new();
    let stats = view.paint(&mut canvas).unwrap();
    assert_eq!(stats.rows_painted, CELL_COUNT);
    assert_eq!(canvas.backing_height, view.minimap_data().unwrap().total_content_height.ceil() as u32);

    view.on_scroll(ScrollEvent::new(3_000.0), now);
    assert!(!view.needs_paint());
}
