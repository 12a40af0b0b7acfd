// Chunk: docs/chunks/cell_model - Notebook cell records and ordered cell source

//! lite-notebook-cells: the notebook document model as seen by the cell list.
//!
//! This crate provides the read-only view of a notebook that the minimap and
//! the lazy cell list consume:
//!
//! - [`CellRecord`]: one cell (id, kind, input text, output weight)
//! - [`CellSource`]: ordered, stable-id access to the cells of a notebook
//! - [`Notebook`]: a simple in-memory `CellSource`
//! - [`load_ipynb`] / [`parse_ipynb`]: loading Jupyter documents
//!
//! # Example
//!
//! ```
//! use lite_notebook_cells::{CellRecord, CellSource, Notebook};
//!
//! let notebook = Notebook::from_cells(
//!     "scratch.ipynb",
//!     vec![
//!         CellRecord::markdown("intro", "# Scratch"),
//!         CellRecord::code("load", "df = load()").with_output(1),
//!     ],
//! );
//! assert_eq!(notebook.cell_ids().len(), 2);
//! ```

mod ipynb;
mod notebook;
mod types;

pub use ipynb::{load_ipynb, parse_ipynb, NotebookError};
pub use notebook::{CellSource, Notebook};
pub use types::{CellId, CellKind, CellRecord};
