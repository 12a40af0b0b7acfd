// Chunk: docs/chunks/workspace_layout - Minimap engine crate layout
//!
//! lite-notebook: a notebook cell list that mounts cells lazily, with a
//! minimap of the whole document.
//!
//! The engine is headless. The host supplies:
//!
//! - a [`CellSource`](lite_notebook_cells::CellSource) with the ordered cells
//! - a [`LayoutOracle`] reporting where mounted cells actually landed
//! - a [`Storage`] for the persisted settings
//! - a [`Canvas`] to paint the minimap onto
//!
//! and forwards its scroll, resize, layout and pointer events to a
//! [`CellListView`]. The view answers with [`RowSlot`]s (which cells to mount
//! with real content, which as placeholders), minimap paints, and
//! [`SeekTarget`]s for minimap navigation.
//!
//! Pipeline per recompute:
//!
//! 1. [`build_rows`]: one row per cell with preview lines
//! 2. [`resolve_geometry`]: real tops and heights, layout first
//! 3. [`project`]: one scale factor onto a bounded track
//! 4. [`sync_from_notebook`]: track scroll and thumb placement
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! use lite_notebook::{
//!     CellListView, DisplayList, ListViewOptions, MemoryStorage, SettingsBus, StaticLayout,
//! };
//! use lite_notebook_cells::{CellRecord, Notebook};
//! use lite_notebook_input::ViewportSize;
//!
//! let notebook = Notebook::from_cells(
//!     "demo.ipynb",
//!     (0..100).map(|i| CellRecord::code(format!("c{}", i), "print(1)")),
//! );
//! let layout = StaticLayout::estimate(&notebook);
//! let mut view = CellListView::new(
//!     notebook,
//!     layout,
//!     Rc::new(MemoryStorage::new()),
//!     Arc::new(SettingsBus::new()),
//!     ListViewOptions::default(),
//! );
//!
//! view.mount(ViewportSize::new(1280.0, 800.0), Instant::now());
//! let mut canvas = DisplayList::new();
//! let stats = view.paint(&mut canvas).unwrap();
//! assert_eq!(stats.rows_painted, 100);
//! ```

pub mod canvas;
pub mod cell_list_view;
pub mod color_palette;
pub mod debounce;
pub mod dialog_token;
pub mod geometry;
pub mod height_cache;
pub mod hydration;
pub mod minimap_renderer;
pub mod projection;
pub mod row_model;
pub mod scroll_cache;
pub mod settings;
pub mod storage;
pub mod viewport_sync;

pub use canvas::{Canvas, DisplayList, DrawCommand, Rect};
pub use cell_list_view::{CellListView, ListViewOptions, RowSlot, MIN_CONTAINER_WIDTH, MIN_VIEWPORT_HEIGHT};
pub use color_palette::{KindPalette, MinimapPalette};
pub use debounce::{Debouncer, Throttle};
pub use dialog_token::{DialogOwnership, InstanceId, SETTINGS_DIALOG};
pub use geometry::{resolve_geometry, CellBox, LayoutOracle, ResolvedGeometry, StaticLayout};
pub use height_cache::HeightCache;
pub use hydration::{HydratedSet, HydrationController};
pub use minimap_renderer::{DebugOverlay, MinimapRenderer, PaintStats};
pub use projection::{project, MinimapData};
pub use row_model::{build_rows, Row};
pub use scroll_cache::ScrollPositionCache;
pub use settings::{
    load_settings, load_stored_settings, MinimapSettings, QueryOverrides, SettingsBus, SettingsStore,
    SettingsSubscription,
};
pub use storage::{JsonFileStorage, MemoryStorage, Storage, StorageError};
pub use viewport_sync::{sync_from_notebook, MinimapViewport, SeekTarget};
