// Chunk: docs/chunks/minimap_canvas - Minimap canvas painting
//!
//! Paints a [`MinimapData`] frame onto a [`Canvas`].
//!
//! Painting happens once per frame change, never per scroll event: the
//! track is drawn in full and the host scrolls the canvas inside the rail.
//!
//! Per row, in order:
//! - a background rect tinted by cell kind
//! - a translucent highlight if the row is current
//! - a thin accent bar on the trailing edge if the cell has output
//! - an outline if the row is current
//! - as many preview lines as fit, tinted by the preview tokenizer
//!
//! Text is budgeted twice: per row by how many lines fit the row's scaled
//! height, and globally by `GLOBAL_LINE_CAP`. Once the global cap is hit the
//! remaining rows still get their backgrounds and indicators, just no text.

use unicode_width::UnicodeWidthChar;

use lite_notebook_syntax::{tokenize, Rgba, SyntaxTheme, TokenKind};

use crate::canvas::{Canvas, Rect};
use crate::color_palette::MinimapPalette;
use crate::projection::MinimapData;

// =============================================================================
// Layout Constants
// =============================================================================

/// Backing store pixel ratio is capped here to bound canvas memory
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Maximum preview lines drawn across the whole canvas
pub const GLOBAL_LINE_CAP: usize = 4000;

/// Vertical space inside a row not available to text
pub const ROW_TEXT_MARGIN: f32 = 2.0;

/// Left inset of preview text
pub const TEXT_INSET_X: f32 = 4.0;

/// Width of the output indicator bar
pub const OUTPUT_ACCENT_WIDTH: f32 = 2.0;

/// Width of the current-row outline
pub const OUTLINE_WIDTH: f32 = 1.0;

/// Monospace advance as a fraction of font size
pub const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Font size of the debug overlay text
pub const DEBUG_FONT_PX: f32 = 9.0;

/// Line height of the debug overlay text
pub const DEBUG_LINE_HEIGHT: f32 = 11.0;

/// Font size and line height of preview text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub font_px: f32,
    pub line_height: f32,
}

/// Preview font by minimap width: (exclusive upper width bound, metrics).
/// Wider minimaps get larger, more legible text.
const FONT_TABLE: [(f32, FontMetrics); 4] = [
    (100.0, FontMetrics { font_px: 2.0, line_height: 3.0 }),
    (140.0, FontMetrics { font_px: 3.0, line_height: 4.0 }),
    (200.0, FontMetrics { font_px: 4.0, line_height: 5.0 }),
    (f32::INFINITY, FontMetrics { font_px: 5.0, line_height: 6.0 }),
];

/// Returns the preview font for a minimap of the given width.
pub fn font_for_width(width: f32) -> FontMetrics {
    FONT_TABLE
        .iter()
        .find(|(bound, _)| width < *bound)
        .map(|(_, metrics)| *metrics)
        .unwrap_or(FONT_TABLE[FONT_TABLE.len() - 1].1)
}

/// Clamps a device pixel ratio to `(0, MAX_PIXEL_RATIO]`, defaulting to 1.
pub fn effective_pixel_ratio(device_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Geometry numbers shown by the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugOverlay {
    pub thumb_top: f32,
    pub thumb_height: f32,
    pub ratio: f32,
    /// Overlay text is anchored to the visible part of the track
    pub mini_scroll_top: f32,
}

/// What a paint pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    pub rows_painted: usize,
    pub lines_drawn: usize,
    pub line_cap_hit: bool,
}

/// Paints minimap frames.
#[derive(Debug, Clone)]
pub struct MinimapRenderer {
    palette: MinimapPalette,
    theme: SyntaxTheme,
    line_cap: usize,
}

impl Default for MinimapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimapRenderer {
    pub fn new() -> Self {
        Self {
            palette: MinimapPalette::default(),
            theme: SyntaxTheme::default(),
            line_cap: GLOBAL_LINE_CAP,
        }
    }

    /// Returns a renderer with a different global line cap.
    pub fn with_line_cap(mut self, line_cap: usize) -> Self {
        self.line_cap = line_cap;
        self
    }

    pub fn palette(&self) -> &MinimapPalette {
        &self.palette
    }

    /// Paints `data` onto `canvas`, resizing it to the full track.
    pub fn paint<C: Canvas + ?Sized>(
        &self,
        data: &MinimapData,
        track_width: f32,
        device_pixel_ratio: f32,
        canvas: &mut C,
        overlay: Option<&DebugOverlay>,
    ) -> PaintStats {
        let width = track_width.max(0.0);
        let pixel_ratio = effective_pixel_ratio(device_pixel_ratio);
        canvas.resize(width, data.total_content_height, pixel_ratio);
        canvas.fill_rect(
            Rect::new(0.0, 0.0, width, data.total_content_height),
            self.palette.track_background,
        );

        let font = font_for_width(width);
        let char_width = font.font_px * CHAR_WIDTH_RATIO;
        let text_width = width - 2.0 * TEXT_INSET_X - OUTPUT_ACCENT_WIDTH;
        let max_columns = if text_width > 0.0 {
            (text_width / char_width).floor() as usize
        } else {
            0
        };

        let mut stats = PaintStats::default();

        for row in &data.rows {
            let kind_palette = self.palette.for_kind(row.kind);
            let rect = Rect::new(0.0, row.top, width, row.height);

            canvas.fill_rect(rect, kind_palette.background);
            if row.is_current {
                canvas.fill_rect(rect, self.palette.current_highlight);
            }
            if row.has_output {
                canvas.fill_rect(
                    Rect::new(width - OUTPUT_ACCENT_WIDTH, row.top, OUTPUT_ACCENT_WIDTH, row.height),
                    self.palette.output_accent,
                );
            }
            if row.is_current {
                let inset = OUTLINE_WIDTH / 2.0;
                canvas.stroke_rect(
                    Rect::new(inset, row.top + inset, width - OUTLINE_WIDTH, row.height - OUTLINE_WIDTH),
                    self.palette.current_outline,
                    OUTLINE_WIDTH,
                );
            }
            stats.rows_painted += 1;

            if stats.line_cap_hit || max_columns == 0 {
                continue;
            }

            let fit = ((row.height - ROW_TEXT_MARGIN) / font.line_height).floor();
            if fit < 1.0 {
                continue;
            }
            let fit = (fit as usize).min(row.preview_lines.len());

            for (i, line) in row.preview_lines.iter().take(fit).enumerate() {
                if stats.lines_drawn >= self.line_cap {
                    stats.line_cap_hit = true;
                    break;
                }
                let y = row.top + ROW_TEXT_MARGIN / 2.0 + i as f32 * font.line_height;
                self.draw_preview_line(canvas, line, y, font, char_width, max_columns, kind_palette.text);
                stats.lines_drawn += 1;
            }
        }

        if let Some(overlay) = overlay {
            self.draw_debug_overlay(canvas, data, overlay, width);
        }

        stats
    }

    /// Draws one tokenized line, clipped to `max_columns` display columns.
    #[allow(clippy::too_many_arguments)]
    fn draw_preview_line<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        line: &str,
        y: f32,
        font: FontMetrics,
        char_width: f32,
        max_columns: usize,
        base_color: Rgba,
    ) {
        let mut column = 0usize;

        for token in tokenize(line) {
            if column >= max_columns {
                break;
            }
            let text = &line[token.range];

            // Clip the token at the column budget on a char boundary.
            let mut width = 0usize;
            let mut end = text.len();
            for (idx, ch) in text.char_indices() {
                let w = ch.width().unwrap_or(0);
                if column + width + w > max_columns {
                    end = idx;
                    break;
                }
                width += w;
            }
            let visible = &text[..end];

            if token.kind != TokenKind::Plain || !visible.trim().is_empty() {
                let color = self.theme.color_for(token.kind).unwrap_or(base_color);
                let x = TEXT_INSET_X + column as f32 * char_width;
                canvas.fill_text(x, y, visible, font.font_px, color);
            }
            column += width;
            if end < text.len() {
                break;
            }
        }
    }

    fn draw_debug_overlay<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        data: &MinimapData,
        overlay: &DebugOverlay,
        width: f32,
    ) {
        let lines = [
            format!("thumb top {:.1}", overlay.thumb_top),
            format!("thumb h {:.1}", overlay.thumb_height),
            format!("ratio {:.3}", overlay.ratio),
            format!("track {:.0}/{:.0}", data.total_content_height, data.rail_height),
            format!("scale {:.4}", data.scale),
        ];
        let top = overlay.mini_scroll_top + 4.0;
        for (i, line) in lines.iter().enumerate() {
            canvas.fill_text(
                TEXT_INSET_X.min(width),
                top + i as f32 * DEBUG_LINE_HEIGHT,
                line,
                DEBUG_FONT_PX,
                self.palette.debug_text,
            );
        }
    }
}
