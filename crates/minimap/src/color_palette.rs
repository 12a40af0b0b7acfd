// Chunk: docs/chunks/minimap_canvas - Minimap colors per cell kind
//!
//! Color palette for the minimap canvas.
//!
//! Each cell kind gets a fixed tint for its row background and a base text
//! color for untinted preview text. Highlight, outline and output-indicator
//! colors are shared across kinds. All values are Catppuccin Mocha derived,
//! matching the token theme in `lite-notebook-syntax`.

use lite_notebook_cells::CellKind;
use lite_notebook_syntax::Rgba;

// =============================================================================
// Catppuccin Mocha Derived Colors
// =============================================================================

/// Track background: #181825 (Catppuccin Mocha "mantle")
const TRACK_BACKGROUND: Rgba = [
    0.094, // 0x18 / 255
    0.094, // 0x18 / 255
    0.145, // 0x25 / 255
    1.0,
];

/// Current row overlay: lavender at low alpha
const CURRENT_HIGHLIGHT: Rgba = [0.706, 0.745, 0.996, 0.18];

/// Current row outline: #b4befe (lavender)
const CURRENT_OUTLINE: Rgba = [0.706, 0.745, 0.996, 0.9];

/// Output accent bar: #a6e3a1 (green)
const OUTPUT_ACCENT: Rgba = [0.651, 0.890, 0.631, 0.85];

/// Debug overlay text: #f9e2af (yellow)
const DEBUG_TEXT: Rgba = [0.976, 0.886, 0.686, 1.0];

/// Row background and base text color for one cell kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindPalette {
    pub background: Rgba,
    pub text: Rgba,
}

const CODE_PALETTE: KindPalette = KindPalette {
    background: [0.192, 0.196, 0.267, 1.0], // #313244 surface0
    text: [0.729, 0.753, 0.847, 1.0],       // #bac2de subtext1
};

const MARKDOWN_PALETTE: KindPalette = KindPalette {
    background: [0.165, 0.212, 0.310, 1.0], // blue-tinted surface
    text: [0.537, 0.706, 0.980, 1.0],       // #89b4fa blue
};

const RAW_PALETTE: KindPalette = KindPalette {
    background: [0.259, 0.212, 0.196, 1.0], // peach-tinted surface
    text: [0.980, 0.702, 0.529, 1.0],       // #fab387 peach
};

const UNKNOWN_PALETTE: KindPalette = KindPalette {
    background: [0.271, 0.278, 0.353, 1.0], // #45475a surface1
    text: [0.576, 0.600, 0.698, 1.0],       // #9399b2 overlay2
};

/// Colors used by the minimap renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapPalette {
    pub track_background: Rgba,
    pub current_highlight: Rgba,
    pub current_outline: Rgba,
    pub output_accent: Rgba,
    pub debug_text: Rgba,
    pub code: KindPalette,
    pub markdown: KindPalette,
    pub raw: KindPalette,
    pub unknown: KindPalette,
}

impl Default for MinimapPalette {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl MinimapPalette {
    /// Creates the palette with Catppuccin Mocha colors.
    pub fn catppuccin_mocha() -> Self {
        Self {
            track_background: TRACK_BACKGROUND,
            current_highlight: CURRENT_HIGHLIGHT,
            current_outline: CURRENT_OUTLINE,
            output_accent: OUTPUT_ACCENT,
            debug_text: DEBUG_TEXT,
            code: CODE_PALETTE,
            markdown: MARKDOWN_PALETTE,
            raw: RAW_PALETTE,
            unknown: UNKNOWN_PALETTE,
        }
    }

    /// Returns the palette for a cell kind.
    pub fn for_kind(&self, kind: CellKind) -> &KindPalette {
        match kind {
            CellKind::Code => &self.code,
            CellKind::Markdown => &self.markdown,
            CellKind::Raw => &self.raw,
            CellKind::Unknown => &self.unknown,
        }
    }
}
