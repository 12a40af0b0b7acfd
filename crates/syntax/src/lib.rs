// Chunk: docs/chunks/preview_tokenizer - Regex preview tokenizer for minimap text

//! lite-notebook-syntax: cheap syntax tinting for minimap preview lines.
//!
//! Minimap text is a few pixels tall, so this is a presentation aid and not
//! a parser. A single regex pass splits each line into comment, string,
//! number, keyword and plain spans. The pass never fails: unterminated
//! strings run to the end of the line, and anything unmatched is plain text.
//!
//! - [`tokenize`]: split one line into [`Token`]s covering the whole line
//! - [`SyntaxTheme`]: maps [`TokenKind`]s to RGBA colors
//!
//! # Example
//!
//! ```
//! use lite_notebook_syntax::{tokenize, TokenKind};
//!
//! let line = "x = 42  # answer";
//! let kinds: Vec<TokenKind> = tokenize(line).iter().map(|t| t.kind).collect();
//! assert!(kinds.contains(&TokenKind::Number));
//! assert_eq!(kinds.last(), Some(&TokenKind::Comment));
//! ```

mod theme;
mod tokenizer;

pub use theme::{Rgba, SyntaxTheme};
pub use tokenizer::{tokenize, Token, TokenKind};
