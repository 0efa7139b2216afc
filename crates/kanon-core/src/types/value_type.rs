//! Column and hierarchy typing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value domain of a quasi-identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Numeric,
    String,
    Temporal,
}

impl ValueType {
    /// Whether the domain is ordered densely enough to support intervals.
    pub fn supports_ranges(self) -> bool {
        matches!(self, Self::Numeric | Self::Temporal)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::String => write!(f, "string"),
            Self::Temporal => write!(f, "temporal"),
        }
    }
}

/// Shape of a generalization hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyKind {
    /// Leaves are the raw values; inner nodes are synthetic labels.
    #[default]
    Distinct,
    /// Every node is an interval; raw values resolve to a leaf by containment.
    Range,
}

impl fmt::Display for HierarchyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distinct => write!(f, "distinct"),
            Self::Range => write!(f, "range"),
        }
    }
}

/// Ordering policy name as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderingKind {
    #[default]
    Natural,
    Shuffled,
    Lexicographic,
}

/// Order applied to the leaf level before grouping during autogeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Domain order (numeric, lexicographic, chronological).
    #[default]
    Natural,
    /// Seeded shuffle; the same seed always yields the same tree.
    Shuffled { seed: u64 },
    /// Order by rendered string, so `"10"` sorts before `"9"`.
    Lexicographic,
}

impl OrderingPolicy {
    pub fn from_kind(kind: OrderingKind, seed: u64) -> Self {
        match kind {
            OrderingKind::Natural => Self::Natural,
            OrderingKind::Shuffled => Self::Shuffled { seed },
            OrderingKind::Lexicographic => Self::Lexicographic,
        }
    }
}
