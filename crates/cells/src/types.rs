// Chunk: docs/chunks/cell_model - Notebook cell records and ordered cell source

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a notebook cell.
///
/// Ids survive edits and reordering, so they key every per-cell cache
/// (measured heights, hydration state) in the list view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CellId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CellId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The declared type of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Code,
    Markdown,
    Raw,
    Unknown,
}

impl CellKind {
    /// Resolves a declared cell type string.
    ///
    /// Missing and unrecognized types fall back to `Code`. Only the literal
    /// type `"unknown"` maps to `Unknown`.
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("markdown") => CellKind::Markdown,
            Some(t) if t.eq_ignore_ascii_case("raw") => CellKind::Raw,
            Some(t) if t.eq_ignore_ascii_case("unknown") => CellKind::Unknown,
            _ => CellKind::Code,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Code => "code",
            CellKind::Markdown => "markdown",
            CellKind::Raw => "raw",
            CellKind::Unknown => "unknown",
        }
    }
}

/// One cell as owned by the notebook document.
///
/// The list view only reads these. `output_size` is a weight signal (how
/// much output the cell carries); its exact unit does not matter, only
/// whether it is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub id: CellId,
    #[serde(default)]
    pub kind: CellKind,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub output_size: usize,
}

impl CellRecord {
    pub fn new(id: impl Into<CellId>, kind: CellKind, input: Option<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            input,
            output_size: 0,
        }
    }

    /// A code cell with the given source.
    pub fn code(id: impl Into<CellId>, input: impl Into<String>) -> Self {
        Self::new(id, CellKind::Code, Some(input.into()))
    }

    /// A markdown cell with the given source.
    pub fn markdown(id: impl Into<CellId>, input: impl Into<String>) -> Self {
        Self::new(id, CellKind::Markdown, Some(input.into()))
    }

    /// Returns a copy carrying the given output weight.
    pub fn with_output(mut self, output_size: usize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn has_output(&self) -> bool {
        self.output_size > 0
    }
}
