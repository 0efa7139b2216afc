//! Incremental computation: derive a node's set from an ancestor's set.
//!
//! Each stored signature string is re-entered into its hierarchy at the
//! level the ancestor left it, then generalized the remaining steps. Only
//! distinct signatures are visited, never rows.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use kanon_core::config::FrequencyConfig;
use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::traits::{LatticeNode, Transformation};
use kanon_core::types::{FxHashMap, HierarchyKind};
use rayon::prelude::*;

use super::projection::validate_node;
use super::{FrequencySet, Signature};
use crate::domain::{parse_range, DomainValue};
use crate::hierarchy::{HierarchySet, HierarchyTree, Position};

impl FrequencySet {
    /// Derive the set of `node` from `parent_set`, computed for `parent_node`.
    ///
    /// `node` must dominate `parent_node` component-wise. Signatures that
    /// collapse onto the same child signature have their counts added.
    pub fn compute_from_parent<N, P>(
        node: &N,
        parent_node: &P,
        parent_set: &FrequencySet,
        hierarchies: &HierarchySet,
        qi_columns: &[usize],
    ) -> GeneralizationResult<Self>
    where
        N: LatticeNode + ?Sized,
        P: LatticeNode + ?Sized,
    {
        let started = Instant::now();
        let child_steps = node.transformation();
        let parent_steps = parent_node.transformation();
        let trees = validate_node(child_steps, hierarchies, qi_columns)?;

        let transformation = Transformation::new(child_steps.iter().copied());
        if !transformation.dominates(parent_steps) {
            return Err(GeneralizationError::invalid_transformation(format!(
                "{transformation} does not dominate {}",
                Transformation::new(parent_steps.iter().copied())
            )));
        }
        if parent_set.transformation().transformation() != parent_steps {
            return Err(GeneralizationError::invalid_transformation(format!(
                "parent set belongs to {}, not {}",
                parent_set.transformation(),
                Transformation::new(parent_steps.iter().copied())
            )));
        }

        let mut columns: Vec<Reprojector<'_>> = qi_columns
            .iter()
            .zip(trees)
            .zip(parent_steps.iter().zip(child_steps))
            .map(|((&column, tree), (&from, &to))| Reprojector::new(column, tree, from, to))
            .collect();

        let mut counts: FxHashMap<Signature, u64> =
            FxHashMap::with_capacity_and_hasher(parent_set.len(), Default::default());
        for (signature, count) in parent_set.iter() {
            if signature.len() != columns.len() {
                let column = qi_columns.get(signature.len()).copied().unwrap_or(signature.len());
                return Err(GeneralizationError::malformed(
                    column,
                    signature.to_string(),
                    format!("expected {} components, found {}", columns.len(), signature.len()),
                ));
            }
            let child = columns
                .iter_mut()
                .zip(signature.values())
                .map(|(column, stored)| column.reproject(stored))
                .collect::<GeneralizationResult<Signature>>()?;
            *counts.entry(child).or_insert(0) += count;
        }

        debug_assert_eq!(counts.values().sum::<u64>(), parent_set.total());
        tracing::debug!(
            %transformation,
            parent = %parent_set.transformation(),
            parent_set_size = parent_set.len(),
            frequency_set_size = counts.len(),
            compute_time_us = started.elapsed().as_micros() as u64,
            "frequency set derived from parent"
        );
        Ok(Self::from_counts(transformation, counts, parent_set.row_count()))
    }

    /// Derive several sibling nodes from one shared parent set.
    ///
    /// Siblings only read the parent, so they run on the rayon pool once
    /// there are enough of them. Results keep the order of `children`.
    pub fn compute_siblings<N, P>(
        children: &[N],
        parent_node: &P,
        parent_set: &FrequencySet,
        hierarchies: &HierarchySet,
        qi_columns: &[usize],
        config: &FrequencyConfig,
    ) -> Vec<GeneralizationResult<Self>>
    where
        N: LatticeNode + Sync,
        P: LatticeNode + Sync + ?Sized,
    {
        let derive =
            |child: &N| Self::compute_from_parent(child, parent_node, parent_set, hierarchies, qi_columns);
        if config.effective_parallel_siblings() && children.len() >= config.effective_parallel_threshold() {
            children.par_iter().map(derive).collect()
        } else {
            children.iter().map(derive).collect()
        }
    }
}

/// Moves the stored values of one column from the parent's step count to
/// the child's.
struct Reprojector<'a> {
    column: usize,
    tree: &'a HierarchyTree,
    from: u32,
    to: u32,
    cache: FxHashMap<Arc<str>, Arc<str>>,
}

impl<'a> Reprojector<'a> {
    fn new(column: usize, tree: &'a HierarchyTree, from: u32, to: u32) -> Self {
        Self {
            column,
            tree,
            from,
            to,
            cache: FxHashMap::default(),
        }
    }

    fn reproject(&mut self, stored: &Arc<str>) -> GeneralizationResult<Arc<str>> {
        if self.from == self.to {
            return Ok(stored.clone());
        }
        if let Some(hit) = self.cache.get(stored) {
            return Ok(hit.clone());
        }
        let start = self.resume(stored)?;
        let position = self.tree.generalize_by(start, self.to - self.from)?;
        let rendered = self.tree.render(&position);
        self.cache.insert(stored.clone(), rendered.clone());
        Ok(rendered)
    }

    /// Re-enter the tree where the parent left this value.
    ///
    /// At step 0 the string is a raw value (or the missing marker). Past it,
    /// the string names a node on the level `from` steps above the leaves;
    /// missing values sit on the root instead, wherever that is.
    fn resume(&self, stored: &str) -> GeneralizationResult<Position> {
        let malformed = |message: String| GeneralizationError::malformed(self.column, stored, message);

        let Some(level) = self.tree.level_after(self.from).filter(|_| self.from > 0) else {
            let value = DomainValue::from_text(stored, self.tree.value_type())
                .map_err(|e| malformed(e.to_string()))?;
            return self.tree.locate_leaf(&value);
        };

        let label: Cow<'_, str> = match self.tree.kind() {
            HierarchyKind::Range => parse_range(stored, self.tree.value_type())
                .map(|interval| Cow::Owned(interval.to_string()))
                .map_err(|e| malformed(e.to_string()))?,
            HierarchyKind::Distinct => Cow::Borrowed(stored),
        };
        self.tree
            .find_at_level(level, &label)
            .or_else(|| self.tree.find_at_level(0, &label))
            .map(Position::Node)
            .ok_or_else(|| malformed(format!("not a node on level {level} of {}", self.tree.name())))
    }
}
