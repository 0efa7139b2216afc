//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for generalization vectors (QI counts are usually small).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
