//! Generalization hierarchies: explicit trees, autogeneration, per-column sets.

pub mod autogen;
pub mod set;
pub mod tree;

pub use autogen::{expected_height, HierarchyAutoBuilder, LabelSource, SequentialLabels};
pub use set::HierarchySet;
pub use tree::{BuilderNode, HierarchyBuilder, HierarchyTree, NodeId, Position};
