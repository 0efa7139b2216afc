//! Full-scan computation, used for the lattice bottom or whenever no
//! ancestor set is available.

use std::time::Instant;

use kanon_core::errors::GeneralizationResult;
use kanon_core::traits::{Dataset, LatticeNode, Transformation};
use kanon_core::types::FxHashMap;

use super::projection::{validate_node, ColumnProjector};
use super::{FrequencySet, Signature};
use crate::hierarchy::HierarchySet;

impl FrequencySet {
    /// Scan every row, generalize each quasi-identifier by its step count and
    /// count the resulting signatures.
    ///
    /// A missing cell renders as `NaN` at step 0; its first step lands on the
    /// root of the column's hierarchy.
    pub fn compute<N>(
        dataset: &dyn Dataset,
        node: &N,
        hierarchies: &HierarchySet,
        qi_columns: &[usize],
    ) -> GeneralizationResult<Self>
    where
        N: LatticeNode + ?Sized,
    {
        let started = Instant::now();
        let steps = node.transformation();
        let trees = validate_node(steps, hierarchies, qi_columns)?;

        let mut projectors = qi_columns
            .iter()
            .zip(trees)
            .zip(steps)
            .map(|((&column, tree), &step)| ColumnProjector::new(dataset, column, tree, step))
            .collect::<GeneralizationResult<Vec<_>>>()?;

        let row_count = dataset.row_count();
        let mut counts: FxHashMap<Signature, u64> = FxHashMap::default();
        for row in 0..row_count {
            let signature = projectors
                .iter_mut()
                .map(|p| p.project_row(row))
                .collect::<GeneralizationResult<Signature>>()?;
            *counts.entry(signature).or_insert(0) += 1;
        }

        let transformation = Transformation::new(steps.iter().copied());
        tracing::debug!(
            %transformation,
            row_count,
            frequency_set_size = counts.len(),
            compute_time_us = started.elapsed().as_micros() as u64,
            "frequency set computed by scan"
        );
        Ok(Self::from_counts(transformation, counts, row_count))
    }
}
