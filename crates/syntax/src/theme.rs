// Chunk: docs/chunks/syntax_highlighting - Catppuccin Mocha theme for preview tokens

//! Token theme mapping preview token kinds to colors.
//!
//! Colors come from the Catppuccin Mocha palette, matching the rest of the
//! UI. Plain tokens have no theme color: the renderer draws them in the base
//! text color of the row's cell kind.

use crate::tokenizer::TokenKind;

/// An RGBA color with components in `[0.0, 1.0]`.
pub type Rgba = [f32; 4];

/// Catppuccin Mocha color palette constants.
mod catppuccin {
    use super::Rgba;

    pub const MAUVE: Rgba = [0.796, 0.651, 0.969, 1.0]; // #cba6f7
    pub const GREEN: Rgba = [0.651, 0.890, 0.631, 1.0]; // #a6e3a1
    pub const PEACH: Rgba = [0.980, 0.702, 0.529, 1.0]; // #fab387
    pub const OVERLAY0: Rgba = [0.424, 0.439, 0.525, 1.0]; // #6c7086
}

/// Colors for each non-plain token kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTheme {
    pub comment: Rgba,
    pub string: Rgba,
    pub number: Rgba,
    pub keyword: Rgba,
}

impl SyntaxTheme {
    /// Creates the Catppuccin Mocha token theme.
    pub fn catppuccin_mocha() -> Self {
        Self {
            comment: catppuccin::OVERLAY0,
            string: catppuccin::GREEN,
            number: catppuccin::PEACH,
            keyword: catppuccin::MAUVE,
        }
    }

    /// Returns the color for a token kind, or `None` for plain text.
    pub fn color_for(&self, kind: TokenKind) -> Option<Rgba> {
        match kind {
            TokenKind::Plain => None,
            TokenKind::Comment => Some(self.comment),
            TokenKind::String => Some(self.string),
            TokenKind::Number => Some(self.number),
            TokenKind::Keyword => Some(self.keyword),
        }
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}
