//! Read-only view of a loaded dataset.

use crate::types::{StringDictionary, ValueType};

/// Column-oriented dataset as loaded by the outer layer.
///
/// Cells are stored as `f64`: literal numbers for numeric columns, dictionary
/// codes for string and temporal columns. Implementations must be immutable
/// for the lifetime of a run so frequency sets can be computed concurrently.
pub trait Dataset: Send + Sync {
    /// Number of rows; every column has exactly this many cells.
    fn row_count(&self) -> usize;

    /// Raw cells of one column, or `None` if the index is out of range.
    fn column(&self, index: usize) -> Option<&[f64]>;

    /// Resolve a column name to its index.
    fn column_index(&self, name: &str) -> Option<usize>;

    /// Value type of a column, or `None` if the index is out of range.
    fn column_type(&self, index: usize) -> Option<ValueType>;

    /// Dictionary of a string or temporal column.
    fn dictionary(&self, index: usize) -> Option<&StringDictionary>;
}
