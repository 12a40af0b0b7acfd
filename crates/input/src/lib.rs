// Chunk: docs/chunks/list_input_events - Host event types for the cell list
//!
//! Input event types for the notebook cell list and its minimap.
//!
//! These types abstract over whatever host delivers scroll, resize and pointer
//! notifications (a browser shell, a native window, a test harness) and give
//! the cell list a plain Rust interface. They live in their own crate so hosts
//! can construct them without depending on the minimap engine.

/// A scroll notification from the main cell column.
///
/// Carries the absolute scroll position rather than a delta: hosts report
/// where the scroll container ended up after the platform applied momentum,
/// clamping and anchoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Distance in pixels from the top of the content to the top of the viewport
    pub scroll_top: f32,
}

impl ScrollEvent {
    /// Creates a scroll event at the given offset.
    pub fn new(scroll_top: f32) -> Self {
        Self { scroll_top }
    }
}

// Chunk: docs/chunks/resize_click_alignment - Viewport size carried with device scale
/// Size of the main cell column viewport.
///
/// `width` is the width of the whole list container (cell column plus
/// minimap), used to decide whether there is room for the minimap at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    /// Container width in logical pixels
    pub width: f32,
    /// Visible height of the scroll container in logical pixels
    pub height: f32,
    /// Ratio of physical to logical pixels (2.0 on most HiDPI displays)
    pub device_pixel_ratio: f32,
}

impl ViewportSize {
    /// Creates a viewport size with a device pixel ratio of 1.0.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Returns a copy with the given device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A pointer event on the minimap rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapPointerEvent {
    /// The type of pointer event
    pub kind: PointerEventKind,
    /// Vertical offset in pixels from the top of the visible rail
    pub offset_y: f32,
}

impl MinimapPointerEvent {
    /// A press (click) at the given rail offset.
    pub fn down(offset_y: f32) -> Self {
        Self {
            kind: PointerEventKind::Down,
            offset_y,
        }
    }

    /// A drag movement at the given rail offset.
    pub fn moved(offset_y: f32) -> Self {
        Self {
            kind: PointerEventKind::Moved,
            offset_y,
        }
    }

    /// A release at the given rail offset.
    pub fn up(offset_y: f32) -> Self {
        Self {
            kind: PointerEventKind::Up,
            offset_y,
        }
    }
}

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Button pressed
    Down,
    /// Pointer moved with the button held
    Moved,
    /// Button released
    Up,
}

/// Any event the cell list reacts to.
///
/// Hosts that funnel everything through one queue can forward these to
/// `CellListView::handle_event` instead of calling the per-event methods.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// The main column scrolled
    Scroll(ScrollEvent),
    /// The container was resized
    Resize(ViewportSize),
    /// The host finished laying out newly mounted cells
    LayoutChanged,
    /// Pointer activity on the minimap rail
    Minimap(MinimapPointerEvent),
    /// A key-value storage entry changed in another context
    StorageChanged {
        /// The storage key that changed
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_size_defaults_to_unit_ratio() {
        let size = ViewportSize::new(1024.0, 768.0);
        assert_eq!(size.device_pixel_ratio, 1.0);

        let hidpi = size.with_device_pixel_ratio(2.0);
        assert_eq!(hidpi.device_pixel_ratio, 2.0);
        assert_eq!(hidpi.width, 1024.0);
    }

    #[test]
    fn test_pointer_constructors() {
        assert_eq!(MinimapPointerEvent::down(4.0).kind, PointerEventKind::Down);
        assert_eq!(MinimapPointerEvent::moved(4.0).kind, PointerEventKind::Moved);
        assert_eq!(MinimapPointerEvent::up(4.0).kind, PointerEventKind::Up);
    }
}
