//! Hierarchies of all quasi-identifiers, keyed by dataset column.

use std::sync::Arc;

use kanon_core::config::HierarchyConfig;
use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::traits::Dataset;
use kanon_core::types::FxHashMap;

use super::autogen::HierarchyAutoBuilder;
use super::tree::HierarchyTree;

/// Read-only hierarchy lookup shared across a lattice run.
#[derive(Debug, Clone, Default)]
pub struct HierarchySet {
    by_column: FxHashMap<usize, Arc<HierarchyTree>>,
}

impl HierarchySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Autogenerate one hierarchy per quasi-identifier column.
    pub fn autogenerate(
        dataset: &dyn Dataset,
        qi_columns: &[usize],
        config: &HierarchyConfig,
    ) -> GeneralizationResult<Self> {
        let mut set = Self::new();
        for &column in qi_columns {
            let tree = HierarchyAutoBuilder::from_config(format!("column_{column}"), config)
                .build_for_column(dataset, column)?;
            tracing::info!(column, height = tree.height(), kind = %tree.kind(), "hierarchy ready");
            set.insert(column, tree);
        }
        Ok(set)
    }

    /// Register a hierarchy, replacing any previous one for the column.
    pub fn insert(&mut self, column: usize, tree: impl Into<Arc<HierarchyTree>>) {
        self.by_column.insert(column, tree.into());
    }

    pub fn get(&self, column: usize) -> GeneralizationResult<&HierarchyTree> {
        self.by_column
            .get(&column)
            .map(Arc::as_ref)
            .ok_or(GeneralizationError::MissingHierarchy { column })
    }

    pub fn contains(&self, column: usize) -> bool {
        self.by_column.contains_key(&column)
    }

    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }

    /// Trees for `qi_columns`, in column order.
    pub(crate) fn resolve(&self, qi_columns: &[usize]) -> GeneralizationResult<Vec<&HierarchyTree>> {
        qi_columns.iter().map(|&c| self.get(c)).collect()
    }
}

impl FromIterator<(usize, HierarchyTree)> for HierarchySet {
    fn from_iter<I: IntoIterator<Item = (usize, HierarchyTree)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (column, tree) in iter {
            set.insert(column, tree);
        }
        set
    }
}
