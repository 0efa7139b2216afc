//! kanon-engine: generalization hierarchies, frequency sets and the
//! k-anonymity check that a lattice search is built on.
//!
//! Flow: raw columns → [`HierarchyAutoBuilder`] (once per column) →
//! [`HierarchySet`] → [`FrequencySet::compute`] at the lattice bottom,
//! [`FrequencySet::compute_from_parent`] everywhere else →
//! [`is_k_anonymous`].

pub mod anonymity;
pub mod dataset;
pub mod domain;
pub mod frequency;
pub mod hierarchy;

pub use anonymity::{is_k_anonymous, AnonymityChecker, AnonymityReport};
pub use dataset::{MemoryDataset, MemoryDatasetBuilder};
pub use domain::{parse_range, DomainValue, IntervalValue, Scalar, SyntheticLabel};
pub use frequency::{FrequencySet, Signature};
pub use hierarchy::{HierarchyAutoBuilder, HierarchySet, HierarchyTree};
