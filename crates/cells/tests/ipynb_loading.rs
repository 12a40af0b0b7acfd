// Chunk: docs/chunks/ipynb_loading - Loading .ipynb documents
//!
//! Integration tests for loading notebooks from disk.

use std::fs;

use lite_notebook_cells::{load_ipynb, CellId, CellKind, CellSource, NotebookError};

const SAMPLE: &str = r##"{
  "nbformat": 4,
  "nbformat_minor": 5,
  "metadata": {},
  "cells": [
    {"id": "intro", "cell_type": "markdown", "metadata": {}, "source": ["# Analysis\n", "Some notes"]},
    {"id": "load", "cell_type": "code", "metadata": {}, "execution_count": 1,
     "source": "import pandas as pd\ndf = pd.read_csv('data.csv')",
     "outputs": [{"output_type": "execute_result", "data": {"text/plain": ["df"]}}]},
    {"id": "notes", "cell_type": "raw", "metadata": {}, "source": ""}
  ]
}"##;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.ipynb");
    fs::write(&path, SAMPLE).unwrap();

    let notebook = load_ipynb(&path).unwrap();

    assert_eq!(notebook.identity(), path.display().to_string());
    let ids: Vec<&str> = notebook.cell_ids().iter().map(CellId::as_str).collect();
    assert_eq!(ids, vec!["intro", "load", "notes"]);

    let intro = notebook.cell(&CellId::new("intro")).unwrap();
    assert_eq!(intro.kind, CellKind::Markdown);
    assert_eq!(intro.input.as_deref(), Some("# Analysis\nSome notes"));

    let load = notebook.cell(&CellId::new("load")).unwrap();
    assert!(load.has_output());

    let notes = notebook.cell(&CellId::new("notes")).unwrap();
    assert_eq!(notes.kind, CellKind::Raw);
    assert_eq!(notes.input, None);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_ipynb(&dir.path().join("missing.ipynb"));
    assert!(matches!(result, Err(NotebookError::Io(_))));
}
