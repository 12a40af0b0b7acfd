// Chunk: docs/chunks/ipynb_loading - Loading .ipynb documents
//!
//! Loading Jupyter `.ipynb` documents into a [`Notebook`].
//!
//! Only the fields the list view needs are read: cell id, cell type, source
//! text and the number of outputs. Cells that fail to deserialize are
//! skipped rather than failing the whole document, so a notebook with one
//! corrupt cell still opens.
//!
//! Documents older than nbformat 4.5 have no cell ids. Those cells get a
//! positional id (`cell-<index>`), and duplicate ids get a numeric suffix so
//! every cell in the result is addressable.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::notebook::Notebook;
use crate::types::{CellId, CellKind, CellRecord};

/// Errors that can occur while loading a notebook document.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// IO error reading the file.
    #[error("failed to read notebook: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON.
    #[error("notebook is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Valid JSON without a `cells` array.
    #[error("document has no cells array")]
    NotANotebook,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    cell_type: Option<String>,
    #[serde(default)]
    source: RawSource,
    #[serde(default)]
    outputs: Vec<serde_json::Value>,
}

/// nbformat allows source as one string or as a list of line strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for RawSource {
    fn default() -> Self {
        RawSource::Text(String::new())
    }
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            RawSource::Text(text) => text,
            RawSource::Lines(lines) => lines.concat(),
        }
    }
}

/// Parses an `.ipynb` document from a JSON string.
pub fn parse_ipynb(json: &str, identity: impl Into<String>) -> Result<Notebook, NotebookError> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    let cells = document
        .get("cells")
        .and_then(serde_json::Value::as_array)
        .ok_or(NotebookError::NotANotebook)?;

    let mut notebook = Notebook::new(identity);
    let mut seen: HashSet<String> = HashSet::with_capacity(cells.len());

    for (index, value) in cells.iter().enumerate() {
        let raw: RawCell = match serde_json::from_value(value.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(index, error = %e, "skipping malformed notebook cell");
                continue;
            }
        };

        let base = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("cell-{}", index));
        let id = unique_id(base, &mut seen);

        let text = raw.source.into_text();
        let input = if text.is_empty() { None } else { Some(text) };

        notebook.push(CellRecord {
            id: CellId::new(id),
            kind: CellKind::from_declared(raw.cell_type.as_deref()),
            input,
            output_size: raw.outputs.len(),
        });
    }

    Ok(notebook)
}

/// Loads an `.ipynb` file. The notebook identity is the file path.
pub fn load_ipynb(path: &Path) -> Result<Notebook, NotebookError> {
    let json = fs::read_to_string(path)?;
    parse_ipynb(&json, path.display().to_string())
}

fn unique_id(base: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.clone()) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
