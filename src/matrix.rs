//! Row-major storage for the categorical matrix.
//!
//! The matrix may be ragged: rows keep their own lengths and the logical column
//! count is the length of the longest row. Data is only ever replaced wholesale.

use crate::error::{ResortError, Result};
use crate::types::{Cell, RowRef};

/// Owned matrix plus the labels used to resolve rows by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixStore {
    rows: Vec<Vec<Cell>>,
    labels: Vec<String>,
    max_columns: usize,
}

impl MatrixStore {
    /// Create a store from rows and optional row labels
    pub fn new(rows: Vec<Vec<Cell>>, labels: Vec<String>) -> Self {
        let max_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            rows,
            labels,
            max_columns,
        }
    }

    /// Build a store from a JSON array of rows.
    ///
    /// Entries that are not arrays become empty rows; cells that are neither
    /// numbers nor strings are stored by their JSON text.
    ///
    /// # Errors
    /// Returns an error if the input is not valid JSON or not a top-level array.
    pub fn from_json(json: &str, labels: Vec<String>) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value, labels)
    }

    /// Build a store from an already-parsed JSON value.
    ///
    /// # Errors
    /// Returns an error if `value` is not an array.
    pub fn from_value(value: &serde_json::Value, labels: Vec<String>) -> Result<Self> {
        let entries = value
            .as_array()
            .ok_or_else(|| ResortError::InvalidMatrix("expected an array of rows".into()))?;
        let rows = entries
            .iter()
            .map(|entry| {
                entry
                    .as_array()
                    .map(|cells| cells.iter().map(Cell::from).collect())
                    .unwrap_or_default()
            })
            .collect();
        Ok(Self::new(rows, labels))
    }

    /// Replace the row labels without touching the data
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Configured row labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row
    pub fn max_column_count(&self) -> usize {
        self.max_columns
    }

    /// All rows, in order
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cells of one row
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell at (row, col); `None` past the end of a short row
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Resolve a row identifier to a row index.
    ///
    /// An index is valid if a row exists there. A label resolves to the position
    /// of the first configured label equal to it, and is valid only if a row
    /// exists at that position.
    ///
    /// # Errors
    /// Returns `InvalidRow` if the identifier matches nothing.
    pub fn resolve_row(&self, row: &RowRef) -> Result<usize> {
        let resolved = match row {
            RowRef::Index(i) => (*i < self.rows.len()).then_some(*i),
            RowRef::Label(label) => self
                .labels
                .iter()
                .position(|l| l == label)
                .filter(|&i| i < self.rows.len()),
        };
        resolved.ok_or_else(|| ResortError::InvalidRow(row.clone()))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn sample() -> MatrixStore {
        MatrixStore::from_json(
            r#"[["a", "b", "a", "c"], ["x", "x"], 7]"#,
            vec!["kind".into(), "tag".into(), "kind".into(), "ghost".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_dimensions() {
        let store = sample();
        assert_eq!(store.row_count(), 3);
        assert_eq!(store.max_column_count(), 4);
        assert_eq!(store.row(1).unwrap().len(), 2);
        // non-array entry becomes an empty row
        assert!(store.row(2).unwrap().is_empty());
        assert_eq!(store.cell(1, 3), None);
        assert_eq!(store.cell(0, 3), Some(&Cell::from("c")));
    }

    #[test]
    fn test_resolve_by_index_and_label() {
        let store = sample();
        assert_eq!(store.resolve_row(&RowRef::Index(1)).unwrap(), 1);
        assert_eq!(store.resolve_row(&RowRef::from("tag")).unwrap(), 1);
        // first matching label wins
        assert_eq!(store.resolve_row(&RowRef::from("kind")).unwrap(), 0);
    }

    #[test]
    fn test_resolve_invalid() {
        let store = sample();
        assert!(matches!(
            store.resolve_row(&RowRef::Index(3)),
            Err(ResortError::InvalidRow(RowRef::Index(3)))
        ));
        assert!(matches!(
            store.resolve_row(&RowRef::from("rowX")),
            Err(ResortError::InvalidRow(_))
        ));
        // label configured, but no row at its position
        assert!(store.resolve_row(&RowRef::from("ghost")).is_err());
    }

    #[test]
    fn test_empty_matrix() {
        let store = MatrixStore::from_json("[]", Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.max_column_count(), 0);
        assert!(MatrixStore::from_json("{}", Vec::new()).is_err());
    }
}
