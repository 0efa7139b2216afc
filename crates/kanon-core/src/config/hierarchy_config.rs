//! Hierarchy autogeneration configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FANOUT, DEFAULT_SHUFFLE_SEED};
use crate::types::{HierarchyKind, OrderingKind, OrderingPolicy};

/// Configuration for hierarchy autogeneration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Children grouped under one synthetic parent. Default: 2.
    pub fanout: Option<usize>,
    /// Leaf ordering before grouping. Default: natural.
    pub ordering: Option<OrderingKind>,
    /// Seed for the shuffled ordering. Default: 0.
    pub seed: Option<u64>,
    /// Tree shape produced for numeric and temporal columns. Default: distinct.
    pub kind: Option<HierarchyKind>,
}

impl HierarchyConfig {
    pub fn effective_fanout(&self) -> usize {
        self.fanout.unwrap_or(DEFAULT_FANOUT)
    }

    pub fn effective_ordering(&self) -> OrderingPolicy {
        OrderingPolicy::from_kind(
            self.ordering.unwrap_or_default(),
            self.seed.unwrap_or(DEFAULT_SHUFFLE_SEED),
        )
    }

    pub fn effective_kind(&self) -> HierarchyKind {
        self.kind.unwrap_or_default()
    }
}
