//! Bottom-up hierarchy construction from a column's distinct values.
//!
//! The leaf level is ordered once by the ordering policy, then split into
//! consecutive runs of `fanout`; each run gets one fresh parent. Runs are
//! formed on that order at every level, never re-sorted, until a single
//! root remains.

use std::collections::BTreeSet;

use kanon_core::config::HierarchyConfig;
use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::traits::Dataset;
use kanon_core::types::{FxHashSet, HierarchyKind, OrderingPolicy, ValueType};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::tree::{HierarchyTree, LevelLayout};
use crate::domain::{is_missing, DomainValue, IntervalValue, Scalar, SyntheticLabel};

/// Supplier of synthetic labels for inner nodes.
pub trait LabelSource {
    fn next_label(&mut self) -> SyntheticLabel;
}

/// Counter-based labels: `#1`, `#2`, ...
#[derive(Debug, Clone)]
pub struct SequentialLabels {
    next: u64,
}

impl SequentialLabels {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialLabels {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelSource for SequentialLabels {
    fn next_label(&mut self) -> SyntheticLabel {
        let label = SyntheticLabel(self.next);
        self.next += 1;
        label
    }
}

/// Height of an autogenerated tree over `leaves` leaves: ⌈log_f(n)⌉ + 1,
/// computed with integer ceil-division so exact powers still get their root.
pub fn expected_height(leaves: usize, fanout: usize) -> usize {
    let mut height = 1;
    let mut width = leaves;
    while width > 1 {
        width = width.div_ceil(fanout);
        height += 1;
    }
    height
}

#[derive(Debug, Clone)]
pub struct HierarchyAutoBuilder {
    name: String,
    fanout: usize,
    ordering: OrderingPolicy,
    kind: HierarchyKind,
}

impl HierarchyAutoBuilder {
    pub fn new(name: impl Into<String>, fanout: usize) -> Self {
        Self {
            name: name.into(),
            fanout,
            ordering: OrderingPolicy::Natural,
            kind: HierarchyKind::Distinct,
        }
    }

    pub fn from_config(name: impl Into<String>, config: &HierarchyConfig) -> Self {
        Self::new(name, config.effective_fanout())
            .with_ordering(config.effective_ordering())
            .with_kind(config.effective_kind())
    }

    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_kind(mut self, kind: HierarchyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn fanout(&self) -> usize {
        self.fanout
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub fn kind(&self) -> HierarchyKind {
        self.kind
    }

    /// Distinct hierarchy over `values`; the shuffled policy draws from a
    /// ChaCha generator seeded with the policy's seed.
    pub fn build<I>(&self, values: I, value_type: ValueType) -> GeneralizationResult<HierarchyTree>
    where
        I: IntoIterator<Item = Scalar>,
    {
        let seed = match self.ordering {
            OrderingPolicy::Shuffled { seed } => seed,
            _ => 0,
        };
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        self.build_with_rng(values, value_type, &mut rng, &mut SequentialLabels::new())
    }

    /// Distinct hierarchy with caller-supplied randomness and labels.
    pub fn build_with_rng<I, R, L>(
        &self,
        values: I,
        value_type: ValueType,
        rng: &mut R,
        labels: &mut L,
    ) -> GeneralizationResult<HierarchyTree>
    where
        I: IntoIterator<Item = Scalar>,
        R: Rng + ?Sized,
        L: LabelSource + ?Sized,
    {
        let domain = self.domain(values)?;
        let mut leaves: Vec<Scalar> = domain.into_iter().collect();
        match self.ordering {
            OrderingPolicy::Natural => {}
            OrderingPolicy::Lexicographic => leaves.sort_by_cached_key(|s| s.to_string()),
            OrderingPolicy::Shuffled { .. } => leaves.shuffle(rng),
        }

        let reserved: FxHashSet<String> = leaves.iter().map(|s| s.to_string()).collect();
        let leaf_count = leaves.len();
        let mut levels: Vec<Vec<DomainValue>> = vec![leaves.into_iter().map(DomainValue::Raw).collect()];
        while let Some(width) = levels.last().map(Vec::len).filter(|&w| w > 1) {
            let parents = (0..width.div_ceil(self.fanout))
                .map(|_| DomainValue::Label(fresh_label(labels, &reserved)))
                .collect();
            levels.push(parents);
        }

        self.finish(HierarchyKind::Distinct, value_type, levels, leaf_count)
    }

    /// Range hierarchy: leaves span `fanout` consecutive domain values and
    /// every inner node spans its children.
    pub fn build_ranges<I>(&self, values: I, value_type: ValueType) -> GeneralizationResult<HierarchyTree>
    where
        I: IntoIterator<Item = Scalar>,
    {
        if self.ordering != OrderingPolicy::Natural {
            return Err(GeneralizationError::invalid_hierarchy(
                self.name.as_str(),
                "range hierarchies require natural ordering",
            ));
        }
        if !value_type.supports_ranges() {
            return Err(GeneralizationError::invalid_hierarchy(
                self.name.as_str(),
                format!("{value_type} values cannot form ranges"),
            ));
        }
        let domain: Vec<Scalar> = self.domain(values)?.into_iter().collect();
        let leaf_count = domain.len();

        let mut intervals = domain
            .chunks(self.fanout)
            .map(|run| IntervalValue::new(run[0].clone(), run[run.len() - 1].clone()))
            .collect::<GeneralizationResult<Vec<_>>>()?;
        let mut levels = vec![intervals.iter().cloned().map(DomainValue::Interval).collect::<Vec<_>>()];
        while intervals.len() > 1 {
            intervals = intervals
                .chunks(self.fanout)
                .map(|run| run[0].span(&run[run.len() - 1]))
                .collect::<GeneralizationResult<Vec<_>>>()?;
            levels.push(intervals.iter().cloned().map(DomainValue::Interval).collect());
        }

        self.finish(HierarchyKind::Range, value_type, levels, leaf_count)
    }

    /// Build from one dataset column, resolving codes through its dictionary.
    /// String columns always get a distinct hierarchy.
    pub fn build_for_column(
        &self,
        dataset: &dyn Dataset,
        column: usize,
    ) -> GeneralizationResult<HierarchyTree> {
        let unknown = || GeneralizationError::UnknownColumn {
            column: column.to_string(),
        };
        let value_type = dataset.column_type(column).ok_or_else(unknown)?;
        let cells = dataset.column(column).ok_or_else(unknown)?;
        let dictionary = dataset.dictionary(column);

        let mut seen = FxHashSet::default();
        let mut values = Vec::new();
        for &cell in cells {
            if !seen.insert(cell.to_bits()) {
                continue;
            }
            if let DomainValue::Raw(scalar) = DomainValue::from_cell(cell, value_type, dictionary)? {
                values.push(scalar);
            }
        }

        if self.kind == HierarchyKind::Range && value_type.supports_ranges() {
            self.build_ranges(values, value_type)
        } else {
            self.build(values, value_type)
        }
    }

    /// Validated, sentinel-free, domain-ordered distinct values.
    fn domain<I>(&self, values: I) -> GeneralizationResult<BTreeSet<Scalar>>
    where
        I: IntoIterator<Item = Scalar>,
    {
        if self.fanout < 2 {
            return Err(GeneralizationError::InvalidFanout { fanout: self.fanout });
        }
        let domain: BTreeSet<Scalar> = values.into_iter().filter(|s| !is_missing(s)).collect();
        if domain.is_empty() {
            return Err(GeneralizationError::EmptyDomain);
        }
        Ok(domain)
    }

    /// Turn bottom-up levels into a tree; node `j` of a level hangs under
    /// node `j / fanout` of the level above.
    fn finish(
        &self,
        kind: HierarchyKind,
        value_type: ValueType,
        levels: Vec<Vec<DomainValue>>,
        leaf_count: usize,
    ) -> GeneralizationResult<HierarchyTree> {
        let height = levels.len();
        let mut layout: LevelLayout = Vec::with_capacity(height);
        for (depth, values) in levels.into_iter().rev().enumerate() {
            layout.push(
                values
                    .into_iter()
                    .enumerate()
                    .map(|(j, value)| (value, (depth > 0).then_some(j / self.fanout)))
                    .collect(),
            );
        }

        let tree = HierarchyTree::assemble(self.name.clone(), kind, value_type, layout)?;
        tracing::debug!(
            hierarchy = %self.name,
            %kind,
            leaves = leaf_count,
            height,
            fanout = self.fanout,
            "hierarchy autogenerated"
        );
        Ok(tree)
    }
}

fn fresh_label<L: LabelSource + ?Sized>(labels: &mut L, reserved: &FxHashSet<String>) -> SyntheticLabel {
    loop {
        let label = labels.next_label();
        if !reserved.contains(&label.to_string()) {
            return label;
        }
    }
}
