//! Collaborator traits consumed by the engine.

pub mod dataset;
pub mod lattice;

pub use dataset::Dataset;
pub use lattice::{LatticeNode, Transformation};
