// Chunk: docs/chunks/lazy_hydration - Lazy cell hydration
// Chunk: docs/chunks/minimap_projection - Minimap geometry and scale projection
//!
//! The notebook cell list with its minimap.
//!
//! `CellListView` composes the pieces of this crate and owns the event
//! wiring. The host drives it from its event loop:
//!
//! ```text
//! mount ─► on_scroll / on_resize / on_layout_changed / on_minimap_* ─► tick
//!            │                                                        │
//!            └──────────── row_slots() + paint() after layout ◄───────┘
//! ```
//!
//! Every input that can change the minimap frame (cell order, current cell,
//! viewport size, measured heights) triggers a synchronous recompute: rows,
//! geometry, projection, then the scroll sync. Painting is deferred; the
//! host calls [`CellListView::paint`] after its layout commit when
//! [`CellListView::needs_paint`] says the frame changed.
//!
//! Scrolling never recomputes the frame. It only moves the track and thumb,
//! hydrates placeholders near the viewport, and schedules a scroll save.
//!
//! After [`CellListView::teardown`] every entry point is a no-op.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use lite_notebook_cells::{CellId, CellSource};
use lite_notebook_input::{ListEvent, MinimapPointerEvent, PointerEventKind, ScrollEvent, ViewportSize};

use crate::canvas::Canvas;
use crate::dialog_token::{InstanceId, SETTINGS_DIALOG};
use crate::geometry::{resolve_geometry, LayoutOracle};
use crate::height_cache::HeightCache;
use crate::hydration::{HydratedSet, HydrationController};
use crate::minimap_renderer::{DebugOverlay, MinimapRenderer, PaintStats};
use crate::projection::{project, MinimapData};
use crate::row_model::{build_rows, PLACEHOLDER_MIN_HEIGHT};
use crate::scroll_cache::{ScrollPositionCache, SCROLL_POSITIONS_KEY};
use crate::settings::{MinimapSettings, QueryOverrides, SettingsBus, SettingsStore, SettingsSubscription};
use crate::storage::Storage;
use crate::viewport_sync::{scroll_top_for_ratio, sync_from_notebook, MinimapViewport, SeekTarget};

/// Below this viewport height the minimap is hidden
pub const MIN_VIEWPORT_HEIGHT: f32 = 240.0;

/// Below this container width the minimap is hidden
pub const MIN_CONTAINER_WIDTH: f32 = 640.0;

/// What the host should mount for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSlot {
    /// Render the cell's real content
    Hydrated { id: CellId },
    /// Render an empty element of this height
    Placeholder { id: CellId, height: f32 },
}

impl RowSlot {
    pub fn id(&self) -> &CellId {
        match self {
            RowSlot::Hydrated { id } | RowSlot::Placeholder { id, .. } => id,
        }
    }

    pub fn is_hydrated(&self) -> bool {
        matches!(self, RowSlot::Hydrated { .. })
    }
}

/// Construction options.
#[derive(Debug, Clone)]
pub struct ListViewOptions {
    /// Minimum height of a placeholder row
    pub placeholder_min_height: f32,
    /// Restore and save per-notebook scroll positions
    pub remember_scroll: bool,
    /// Settings forced by the page URL
    pub overrides: QueryOverrides,
}

impl Default for ListViewOptions {
    fn default() -> Self {
        Self {
            placeholder_min_height: PLACEHOLDER_MIN_HEIGHT,
            remember_scroll: false,
            overrides: QueryOverrides::default(),
        }
    }
}

/// An in-progress thumb drag.
#[derive(Debug, Clone, Copy)]
struct ThumbDrag {
    /// Pointer offset from the thumb top at the press
    grab_offset: f32,
}

/// The cell list view.
///
/// Generic over the notebook (`S`), the layout oracle (`O`) and the storage
/// backend (`St`). The storage is cloned into the scroll cache, so pass a
/// shared handle such as `Rc<MemoryStorage>`.
pub struct CellListView<S, O, St>
where
    S: CellSource,
    O: LayoutOracle,
    St: Storage + Clone,
{
    id: InstanceId,
    alive: bool,
    mounted: bool,
    source: S,
    oracle: O,
    settings: SettingsStore<St>,
    subscription: Option<SettingsSubscription>,
    scroll_cache: Option<ScrollPositionCache<St>>,
    heights: HeightCache,
    hydration: HydrationController,
    renderer: MinimapRenderer,
    placeholder_min: f32,

    viewport: ViewportSize,
    scroll_top: f32,
    current: Option<CellId>,
    selection: Vec<CellId>,

    data: Option<MinimapData>,
    mini_viewport: MinimapViewport,
    needs_paint: bool,
    drag: Option<ThumbDrag>,
    dialog_open: bool,
}

impl<S, O, St> CellListView<S, O, St>
where
    S: CellSource,
    O: LayoutOracle,
    St: Storage + Clone,
{
    /// Creates an unmounted view.
    pub fn new(source: S, oracle: O, storage: St, bus: Arc<SettingsBus>, options: ListViewOptions) -> Self {
        let scroll_cache = options
            .remember_scroll
            .then(|| ScrollPositionCache::new(storage.clone()));
        let subscription = Some(bus.subscribe());
        let settings = SettingsStore::new(storage, options.overrides, bus);
        let placeholder_min = if options.placeholder_min_height.is_finite() {
            options.placeholder_min_height.max(1.0)
        } else {
            PLACEHOLDER_MIN_HEIGHT
        };

        Self {
            id: InstanceId::next(),
            alive: true,
            mounted: false,
            source,
            oracle,
            settings,
            subscription,
            scroll_cache,
            heights: HeightCache::new(),
            hydration: HydrationController::new(),
            renderer: MinimapRenderer::new(),
            placeholder_min,
            viewport: ViewportSize::default(),
            scroll_top: 0.0,
            current: None,
            selection: Vec::new(),
            data: None,
            mini_viewport: MinimapViewport::default(),
            needs_paint: false,
            drag: None,
            dialog_open: false,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mounts the list: hydrates the initial window, restores the remembered
    /// scroll position and computes the first frame.
    ///
    /// Returns the scroll offset the host should apply, if one was restored.
    pub fn mount(&mut self, viewport: ViewportSize, now: Instant) -> Option<f32> {
        if !self.alive {
            return None;
        }
        self.viewport = viewport;
        self.mounted = true;

        let focus: Vec<CellId> = self.current.iter().chain(self.selection.iter()).cloned().collect();
        self.hydration.mount(&self.source, focus.iter(), now);

        let restored = self
            .scroll_cache
            .as_ref()
            .and_then(|cache| cache.position(self.source.identity()));

        self.recompute();
        if let Some(scroll_top) = restored {
            self.scroll_top = self.clamp_scroll(scroll_top);
            self.sync();
        }
        self.expand_hydration();

        debug!(
            instance = self.id.get(),
            notebook = self.source.identity(),
            cells = self.source.cell_ids().len(),
            hydrated = self.hydration.hydrated().len(),
            "mounted cell list"
        );
        restored.map(|_| self.scroll_top)
    }

    /// Swaps in a different notebook.
    ///
    /// Hydration restarts from the initial window; measured heights are kept
    /// since ids of unrelated notebooks never collide in practice and stale
    /// entries are never read.
    pub fn reset_list(&mut self, source: S, now: Instant) -> Option<f32> {
        if !self.alive {
            return None;
        }
        self.save_scroll_position(now);
        if let Some(cache) = self.scroll_cache.as_mut() {
            cache.flush();
        }

        debug!(
            instance = self.id.get(),
            from = self.source.identity(),
            to = source.identity(),
            "resetting cell list"
        );
        self.source = source;
        self.restart(now)
    }

    /// Replaces the notebook contents after an edit, insert, removal or
    /// reorder. Hydration carries over while the identity stays the same;
    /// a new identity goes through [`Self::reset_list`].
    ///
    /// Returns the number of newly hydrated cells.
    pub fn update_source(&mut self, source: S, now: Instant) -> usize {
        if !self.alive {
            return 0;
        }
        if source.identity() != self.source.identity() {
            self.reset_list(source, now);
            return self.hydration.hydrated().len();
        }
        self.source = source;
        self.source_changed(now)
    }

    /// Edits the notebook in place, then refreshes the frame as
    /// [`Self::update_source`] does.
    pub fn edit_source(&mut self, now: Instant, edit: impl FnOnce(&mut S)) -> usize {
        if !self.alive {
            return 0;
        }
        let identity = self.source.identity().to_owned();
        edit(&mut self.source);
        if self.source.identity() != identity {
            // The position belongs to the notebook that was showing
            if let Some(cache) = self.scroll_cache.as_mut() {
                cache.record(&identity, self.scroll_top, now);
                cache.flush();
            }
            self.restart(now);
            return self.hydration.hydrated().len();
        }
        self.source_changed(now)
    }

    /// Stops the view. Cancels timers, flushes the scroll cache, releases
    /// the settings dialog and unsubscribes from settings broadcasts.
    pub fn teardown(&mut self, now: Instant) {
        if !self.alive {
            return;
        }
        self.save_scroll_position(now);
        if let Some(cache) = self.scroll_cache.as_mut() {
            cache.flush();
        }
        self.hydration.cancel_timers();
        SETTINGS_DIALOG.release(self.id);
        self.dialog_open = false;
        self.subscription = None;
        self.drag = None;
        self.needs_paint = false;
        self.alive = false;
        debug!(instance = self.id.get(), "tore down cell list");
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn instance_id(&self) -> InstanceId {
        self.id
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// The main column scrolled. Returns the number of newly hydrated cells.
    pub fn on_scroll(&mut self, event: ScrollEvent, now: Instant) -> usize {
        if !self.alive {
            return 0;
        }
        self.scroll_top = if event.scroll_top.is_finite() {
            event.scroll_top.max(0.0)
        } else {
            0.0
        };
        self.sync();
        self.save_scroll_position(now);
        self.expand_hydration()
    }

    /// The container was resized. Returns the number of newly hydrated cells.
    pub fn on_resize(&mut self, viewport: ViewportSize, _now: Instant) -> usize {
        if !self.alive {
            return 0;
        }
        self.viewport = viewport;
        self.recompute();
        self.expand_hydration()
    }

    /// The host laid out newly mounted cells; measured heights may differ.
    pub fn on_layout_changed(&mut self) {
        if !self.alive {
            return;
        }
        self.recompute();
        self.expand_hydration();
    }

    /// Sets the current (focused) cell. It is hydrated and highlighted.
    pub fn set_current_cell(&mut self, id: Option<CellId>) {
        if !self.alive || self.current == id {
            return;
        }
        if let Some(id) = &id {
            self.hydration.hydrate(id);
        }
        self.current = id;
        self.recompute();
    }

    /// A cell was edited; edited cells are always hydrated.
    pub fn mark_edited(&mut self, id: &CellId) {
        if !self.alive {
            return;
        }
        if self.hydration.hydrate(id) {
            trace!(cell = %id, "hydrated edited cell");
        }
    }

    /// Replaces the selection; selected cells are always hydrated.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = CellId>) {
        if !self.alive {
            return;
        }
        self.selection = ids.into_iter().collect();
        for id in &self.selection {
            self.hydration.hydrate(id);
        }
    }

    /// A click on the minimap rail at `offset_y`.
    pub fn on_minimap_click(&mut self, offset_y: f32, now: Instant) -> Option<SeekTarget> {
        if !self.alive || !self.minimap_visible() {
            return None;
        }
        let data = self.data.as_ref()?;
        let target = self.mini_viewport.resolve_click(data, offset_y, self.viewport.height);
        debug!(row = ?target.row, scroll_top = target.scroll_top, "minimap seek");
        self.seek(target.scroll_top, now);
        Some(target)
    }

    /// The thumb was dragged so its top sits at `thumb_top` on the rail.
    pub fn on_minimap_drag(&mut self, thumb_top: f32, now: Instant) -> Option<SeekTarget> {
        if !self.alive || !self.minimap_visible() {
            return None;
        }
        let data = self.data.as_ref()?;
        let ratio = self.mini_viewport.ratio_from_thumb_top(data, thumb_top);
        let scroll_top = scroll_top_for_ratio(ratio, data.notebook_content_height, self.viewport.height);
        self.seek(scroll_top, now);
        Some(SeekTarget { row: None, scroll_top })
    }

    /// Raw pointer input on the rail. A press on the thumb starts a drag,
    /// a press elsewhere seeks.
    pub fn on_minimap_pointer(&mut self, event: MinimapPointerEvent, now: Instant) -> Option<SeekTarget> {
        if !self.alive {
            return None;
        }
        match event.kind {
            PointerEventKind::Down => {
                if self.minimap_visible() && self.mini_viewport.thumb_contains(event.offset_y) {
                    self.drag = Some(ThumbDrag {
                        grab_offset: event.offset_y - self.mini_viewport.thumb_top,
                    });
                    None
                } else {
                    self.on_minimap_click(event.offset_y, now)
                }
            }
            PointerEventKind::Moved => {
                let drag = self.drag?;
                self.on_minimap_drag(event.offset_y - drag.grab_offset, now)
            }
            PointerEventKind::Up => {
                self.drag = None;
                None
            }
        }
    }

    /// Dispatches a queued event. Returns a seek request for minimap input.
    pub fn handle_event(&mut self, event: ListEvent, now: Instant) -> Option<SeekTarget> {
        match event {
            ListEvent::Scroll(scroll) => {
                self.on_scroll(scroll, now);
                None
            }
            ListEvent::Resize(size) => {
                self.on_resize(size, now);
                None
            }
            ListEvent::LayoutChanged => {
                self.on_layout_changed();
                None
            }
            ListEvent::Minimap(pointer) => self.on_minimap_pointer(pointer, now),
            ListEvent::StorageChanged { key } => {
                self.on_storage_event(&key);
                None
            }
        }
    }

    // =========================================================================
    // Timers and settings
    // =========================================================================

    /// Runs due timers: post-mount hydration, scroll saves and settings
    /// broadcasts.
    pub fn tick(&mut self, now: Instant) {
        if !self.alive {
            return;
        }
        if self.hydration.due_timers(now) > 0 {
            self.expand_hydration();
        }
        if let Some(cache) = self.scroll_cache.as_mut() {
            cache.tick(now);
        }
        self.poll_settings();
    }

    /// When `tick` next has timed work, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.alive {
            return None;
        }
        let cache = self.scroll_cache.as_ref().and_then(ScrollPositionCache::next_deadline);
        match (self.hydration.next_deadline(), cache) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Applies settings broadcast by any instance. Returns true on change.
    pub fn poll_settings(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        let Some(latest) = self.subscription.as_ref().and_then(SettingsSubscription::latest) else {
            return false;
        };
        if !self.settings.adopt(latest) {
            return false;
        }
        debug!(instance = self.id.get(), settings = ?self.settings.current(), "minimap settings changed");
        self.needs_paint = true;
        true
    }

    /// A storage key changed in another context.
    pub fn on_storage_event(&mut self, key: &str) {
        if !self.alive || key == SCROLL_POSITIONS_KEY {
            return;
        }
        if self.settings.handle_storage_event(key).is_some() {
            self.needs_paint = true;
        }
    }

    pub fn settings(&self) -> MinimapSettings {
        self.settings.current()
    }

    pub fn set_minimap_enabled(&mut self, enabled: bool) {
        if self.alive && self.settings.set_enabled(enabled) {
            self.needs_paint = true;
        }
    }

    pub fn set_minimap_width(&mut self, width: f32) {
        if self.alive && self.settings.set_width(width) {
            self.needs_paint = true;
        }
    }

    pub fn set_minimap_debug(&mut self, debug: bool) {
        if self.alive && self.settings.set_debug(debug) {
            self.needs_paint = true;
        }
    }

    /// Opens the settings dialog if no other instance has it open.
    pub fn open_settings_dialog(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.dialog_open = SETTINGS_DIALOG.claim(self.id);
        self.dialog_open
    }

    pub fn close_settings_dialog(&mut self) {
        if SETTINGS_DIALOG.release(self.id) {
            self.dialog_open = false;
        }
    }

    pub fn is_settings_dialog_open(&self) -> bool {
        self.dialog_open
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Whether the minimap should be shown at all.
    pub fn minimap_visible(&self) -> bool {
        self.alive
            && self.settings.current().enabled
            && self.viewport.height >= MIN_VIEWPORT_HEIGHT
            && self.viewport.width >= MIN_CONTAINER_WIDTH
    }

    /// Whether the minimap frame changed since the last paint.
    pub fn needs_paint(&self) -> bool {
        self.alive && self.needs_paint && self.minimap_visible()
    }

    /// Paints the current frame. Returns `None` if the minimap is hidden.
    pub fn paint<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Option<PaintStats> {
        if !self.minimap_visible() {
            return None;
        }
        let data = self.data.as_ref()?;
        let settings = self.settings.current();
        let overlay = settings.debug.then(|| DebugOverlay {
            thumb_top: self.mini_viewport.thumb_top,
            thumb_height: self.mini_viewport.thumb_height,
            ratio: self.mini_viewport.ratio,
            mini_scroll_top: self.mini_viewport.mini_scroll_top,
        });

        let stats = self.renderer.paint(
            data,
            settings.width,
            self.viewport.device_pixel_ratio,
            canvas,
            overlay.as_ref(),
        );
        self.needs_paint = false;
        trace!(?stats, "painted minimap");
        Some(stats)
    }

    /// What the host should mount, in document order.
    pub fn row_slots(&self) -> Vec<RowSlot> {
        let Some(data) = self.data.as_ref() else {
            return Vec::new();
        };
        let hydrated = self.hydration.hydrated();
        data.rows
            .iter()
            .map(|row| {
                if hydrated.contains(&row.id) {
                    RowSlot::Hydrated { id: row.id.clone() }
                } else {
                    RowSlot::Placeholder {
                        id: row.id.clone(),
                        height: self.heights.height_or(&row.id, self.placeholder_min),
                    }
                }
            })
            .collect()
    }

    pub fn minimap_data(&self) -> Option<&MinimapData> {
        self.data.as_ref()
    }

    /// Track scroll and thumb placement for the current scroll offset.
    pub fn minimap_viewport(&self) -> MinimapViewport {
        self.mini_viewport
    }

    pub fn hydrated(&self) -> &HydratedSet {
        self.hydration.hydrated()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn current_cell(&self) -> Option<&CellId> {
        self.current.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the layout oracle. Call `on_layout_changed` after
    /// changing it.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Rebuilds rows, resolves geometry and projects the frame.
    fn recompute(&mut self) {
        if !self.mounted {
            return;
        }
        let mut rows = build_rows(&self.source, self.current.as_ref(), &self.heights, self.placeholder_min);
        let resolved = resolve_geometry(
            &mut rows,
            &self.oracle,
            &mut self.heights,
            self.hydration.hydrated(),
            self.placeholder_min,
        );
        let data = project(rows, resolved.content_height, self.viewport.height, self.viewport.height);

        trace!(
            rows = data.rows.len(),
            measured = resolved.measured,
            content_height = resolved.content_height,
            track_height = data.total_content_height,
            scale = data.scale,
            "recomputed minimap"
        );

        if self.data.as_ref() != Some(&data) {
            self.data = Some(data);
            self.needs_paint = true;
        }
        self.scroll_top = self.clamp_scroll(self.scroll_top);
        self.sync();
    }

    /// Moves the track and thumb for the current scroll offset.
    fn sync(&mut self) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        let next = sync_from_notebook(data, self.scroll_top, self.viewport.height);
        if next != self.mini_viewport {
            self.mini_viewport = next;
            // The overlay prints thumb geometry
            if self.settings.current().debug {
                self.needs_paint = true;
            }
        }
    }

    /// Clears per-list state and mounts again for a new notebook identity.
    fn restart(&mut self, now: Instant) -> Option<f32> {
        self.hydration.reset();
        self.scroll_top = 0.0;
        self.current = None;
        self.selection.clear();
        self.drag = None;
        self.data = None;
        self.mount(self.viewport, now)
    }

    /// Drops focus ids the notebook no longer has and recomputes the frame.
    fn source_changed(&mut self, now: Instant) -> usize {
        let ids = self.source.cell_ids();
        if self.current.as_ref().is_some_and(|id| !ids.contains(id)) {
            self.current = None;
        }
        self.selection.retain(|id| ids.contains(id));
        self.drag = None;

        self.recompute();
        let scroll_top = self.clamp_scroll(self.scroll_top);
        if scroll_top != self.scroll_top {
            self.scroll_top = scroll_top;
            self.save_scroll_position(now);
        }
        self.sync();
        let added = self.expand_hydration();
        trace!(
            instance = self.id.get(),
            cells = self.source.cell_ids().len(),
            added,
            "notebook contents changed"
        );
        added
    }

    fn seek(&mut self, scroll_top: f32, now: Instant) {
        self.scroll_top = self.clamp_scroll(scroll_top);
        self.sync();
        self.save_scroll_position(now);
        self.expand_hydration();
    }

    fn expand_hydration(&mut self) -> usize {
        let Some(data) = self.data.as_ref() else {
            return 0;
        };
        self.hydration
            .expand_for_viewport(&data.rows, self.scroll_top, self.viewport.height)
    }

    fn save_scroll_position(&mut self, now: Instant) {
        if let Some(cache) = self.scroll_cache.as_mut() {
            cache.record(self.source.identity(), self.scroll_top, now);
        }
    }

    fn max_scroll(&self) -> f32 {
        self.data
            .as_ref()
            .map_or(0.0, |data| (data.notebook_content_height - self.viewport.height).max(0.0))
    }

    fn clamp_scroll(&self, scroll_top: f32) -> f32 {
        scroll_top.clamp(0.0, self.max_scroll())
    }
}

impl<S, O, St> Drop for CellListView<S, O, St>
where
    S: CellSource,
    O: LayoutOracle,
    St: Storage + Clone,
{
    fn drop(&mut self) {
        if self.alive {
            SETTINGS_DIALOG.release(self.id);
        }
    }
}
