//! Per-column projection of raw cells to their generalized rendering.

use std::sync::Arc;

use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::traits::Dataset;
use kanon_core::types::{FxHashMap, StringDictionary, ValueType};

use crate::domain::DomainValue;
use crate::hierarchy::{HierarchySet, HierarchyTree};

/// Check a generalization vector against the quasi-identifiers and return
/// their trees in column order.
pub(super) fn validate_node<'h>(
    steps: &[u32],
    hierarchies: &'h HierarchySet,
    qi_columns: &[usize],
) -> GeneralizationResult<Vec<&'h HierarchyTree>> {
    if steps.len() != qi_columns.len() {
        return Err(GeneralizationError::invalid_transformation(format!(
            "{} steps for {} quasi-identifiers",
            steps.len(),
            qi_columns.len()
        )));
    }
    let trees = hierarchies.resolve(qi_columns)?;
    for ((&step, &column), tree) in steps.iter().zip(qi_columns).zip(&trees) {
        let max = tree.max_generalization();
        if step > max {
            return Err(GeneralizationError::invalid_transformation(format!(
                "step {step} on column {column} exceeds its maximum of {max}"
            )));
        }
    }
    Ok(trees)
}

/// Generalizes the cells of one column by a fixed number of steps.
///
/// Columns repeat values heavily, so each distinct cell is resolved once.
pub(super) struct ColumnProjector<'a> {
    tree: &'a HierarchyTree,
    cells: &'a [f64],
    value_type: ValueType,
    dictionary: Option<&'a StringDictionary>,
    steps: u32,
    cache: FxHashMap<u64, Arc<str>>,
}

impl<'a> ColumnProjector<'a> {
    pub(super) fn new(
        dataset: &'a dyn Dataset,
        column: usize,
        tree: &'a HierarchyTree,
        steps: u32,
    ) -> GeneralizationResult<Self> {
        let unknown = |detail: String| GeneralizationError::UnknownColumn { column: detail };
        let value_type = dataset
            .column_type(column)
            .ok_or_else(|| unknown(column.to_string()))?;
        let cells = dataset.column(column).ok_or_else(|| unknown(column.to_string()))?;
        if cells.len() != dataset.row_count() {
            return Err(unknown(format!(
                "{column} (holds {} cells for {} rows)",
                cells.len(),
                dataset.row_count()
            )));
        }
        Ok(Self {
            tree,
            cells,
            value_type,
            dictionary: dataset.dictionary(column),
            steps,
            cache: FxHashMap::default(),
        })
    }

    pub(super) fn project_row(&mut self, row: usize) -> GeneralizationResult<Arc<str>> {
        let cell = self.cells[row];
        if let Some(hit) = self.cache.get(&cell.to_bits()) {
            return Ok(hit.clone());
        }
        let value = DomainValue::from_cell(cell, self.value_type, self.dictionary)?;
        let rendered = if self.steps == 0 {
            Arc::from(value.to_string())
        } else {
            let start = self.tree.locate_leaf(&value)?;
            let position = self.tree.generalize_by(start, self.steps)?;
            self.tree.render(&position)
        };
        self.cache.insert(cell.to_bits(), rendered.clone());
        Ok(rendered)
    }
}
