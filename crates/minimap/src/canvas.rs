// Chunk: docs/chunks/minimap_canvas - Canvas seam and recording display list
//!
//! The drawing surface the minimap renderer paints onto.
//!
//! [`Canvas`] is the seam to the platform: a browser host forwards the calls
//! to a 2D canvas context, a GPU host turns them into quads. The renderer
//! works in logical pixels; `resize` tells the surface how many physical
//! pixels back each logical one.
//!
//! [`DisplayList`] is the recording implementation. Tests inspect it, and the
//! probe binary serializes it to JSON.

use serde::Serialize;

use lite_notebook_syntax::Rgba;

/// A rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A drawing surface.
pub trait Canvas {
    /// Resizes the backing store and clears it.
    ///
    /// `width` and `height` are logical pixels; the backing store is
    /// `ceil(width * pixel_ratio) x ceil(height * pixel_ratio)`.
    fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f32);

    /// Draws `text` with its top-left corner at (x, y).
    fn fill_text(&mut self, x: f32, y: f32, text: &str, font_px: f32, color: Rgba);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    StrokeRect {
        rect: Rect,
        color: Rgba,
        line_width: f32,
    },
    FillText {
        x: f32,
        y: f32,
        text: String,
        font_px: f32,
        color: Rgba,
    },
}

/// A canvas that records its drawing operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    /// Logical width
    pub width: f32,
    /// Logical height
    pub height: f32,
    pub pixel_ratio: f32,
    /// Physical backing store width
    pub backing_width: u32,
    /// Physical backing store height
    pub backing_height: u32,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `FillText` commands.
    pub fn text_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillText { .. }))
            .count()
    }

    /// Number of `StrokeRect` commands.
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { .. }))
            .count()
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DisplayList {
    fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.backing_width = (width * pixel_ratio).ceil().max(0.0) as u32;
        self.backing_height = (height * pixel_ratio).ceil().max(0.0) as u32;
        self.commands.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn fill_text(&mut self, x: f32, y: f32, text: &str, font_px: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillText {
            x,
            y,
            text: text.to_string(),
            font_px,
            color,
        });
    }
}
