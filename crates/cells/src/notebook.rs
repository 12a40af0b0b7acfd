// Chunk: docs/chunks/cell_model - Notebook cell records and ordered cell source
//!
//! The ordered cell source and a simple in-memory notebook implementing it.

use std::collections::HashMap;

use crate::types::{CellId, CellRecord};

/// Read access to a notebook's ordered cells.
///
/// This is the only way the list view sees the document. Implementations
/// must return ids in display order and keep ids stable across calls; the
/// view never mutates the source.
pub trait CellSource {
    /// Identity of the list. A change of identity (switching notebooks)
    /// resets per-list state such as the hydrated set.
    fn identity(&self) -> &str;

    /// Cell ids in display order.
    fn cell_ids(&self) -> &[CellId];

    /// The record for `id`, if the document still has one.
    fn cell(&self, id: &CellId) -> Option<&CellRecord>;
}

impl<T: CellSource + ?Sized> CellSource for &T {
    fn identity(&self) -> &str {
        (**self).identity()
    }

    fn cell_ids(&self) -> &[CellId] {
        (**self).cell_ids()
    }

    fn cell(&self, id: &CellId) -> Option<&CellRecord> {
        (**self).cell(id)
    }
}

/// An in-memory notebook: an ordered id list plus a record map.
///
/// The order list may mention ids that have no record (a host that streams
/// records in lazily, or a half-applied edit). Consumers skip those.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    identity: String,
    order: Vec<CellId>,
    cells: HashMap<CellId, CellRecord>,
}

impl Notebook {
    /// Creates an empty notebook with the given identity (usually its path).
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            order: Vec::new(),
            cells: HashMap::new(),
        }
    }

    /// Builds a notebook from records in order.
    pub fn from_cells(identity: impl Into<String>, cells: impl IntoIterator<Item = CellRecord>) -> Self {
        let mut notebook = Self::new(identity);
        for cell in cells {
            notebook.push(cell);
        }
        notebook
    }

    /// Appends a cell. If the id already exists its record is replaced in place.
    pub fn push(&mut self, cell: CellRecord) {
        if !self.cells.contains_key(&cell.id) {
            self.order.push(cell.id.clone());
        }
        self.cells.insert(cell.id.clone(), cell);
    }

    /// Replaces an existing cell's record. Returns false if the id is unknown.
    pub fn replace(&mut self, cell: CellRecord) -> bool {
        match self.cells.get_mut(&cell.id) {
            Some(existing) => {
                *existing = cell;
                true
            }
            None => false,
        }
    }

    /// Removes a cell from both the order and the record map.
    pub fn remove(&mut self, id: &CellId) -> Option<CellRecord> {
        self.order.retain(|existing| existing != id);
        self.cells.remove(id)
    }

    /// Inserts a cell at `index` in display order, clamped to the end.
    /// An existing id is moved to `index` with its record replaced.
    pub fn insert(&mut self, index: usize, cell: CellRecord) {
        self.order.retain(|existing| existing != &cell.id);
        let index = index.min(self.order.len());
        self.order.insert(index, cell.id.clone());
        self.cells.insert(cell.id.clone(), cell);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl CellSource for Notebook {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn cell_ids(&self) -> &[CellId] {
        &self.order
    }

    fn cell(&self, id: &CellId) -> Option<&CellRecord> {
        self.cells.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let notebook = Notebook::from_cells(
            "nb",
            vec![
                CellRecord::code("a", "1"),
                CellRecord::markdown("b", "# hi"),
                CellRecord::code("c", "3"),
            ],
        );
        let ids: Vec<&str> = notebook.cell_ids().iter().map(CellId::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_push_existing_id_replaces_record() {
        let mut notebook = Notebook::new("nb");
        notebook.push(CellRecord::code("a", "old"));
        notebook.push(CellRecord::code("a", "new"));
        assert_eq!(notebook.len(), 1);
        let cell = notebook.cell(&CellId::new("a")).unwrap();
        assert_eq!(cell.input.as_deref(), Some("new"));
    }

    #[test]
    fn test_remove() {
        let mut notebook =
            Notebook::from_cells("nb", vec![CellRecord::code("a", "1"), CellRecord::code("b", "2")]);
        assert!(notebook.remove(&CellId::new("a")).is_some());
        assert_eq!(notebook.cell_ids(), &[CellId::new("b")]);
        assert!(notebook.cell(&CellId::new("a")).is_none());
    }

    #[test]
    fn test_insert_places_and_moves() {
        let mut notebook =
            Notebook::from_cells("nb", vec![CellRecord::code("a", "1"), CellRecord::code("b", "2")]);
        notebook.insert(1, CellRecord::code("new", "x"));
        notebook.insert(99, CellRecord::code("a", "moved"));
        let ids: Vec<&str> = notebook.cell_ids().iter().map(CellId::as_str).collect();
        assert_eq!(ids, vec!["new", "b", "a"]);
        assert_eq!(notebook.cell(&CellId::new("a")).unwrap().input.as_deref(), Some("moved"));
    }

    #[test]
    fn test_replace_unknown_id() {
        let mut notebook = Notebook::new("nb");
        assert!(!notebook.replace(CellRecord::code("zzz", "")));
    }

    #[test]
    fn test_source_through_reference() {
        let notebook = Notebook::from_cells("nb", vec![CellRecord::code("a", "1")]);
        fn count<S: CellSource>(source: S) -> usize {
            source.cell_ids().len()
        }
        assert_eq!(count(&notebook), 1);
        assert_eq!(count(&notebook as &dyn CellSource), 1);
    }
}
