//! Data structures shared across kanon crates.
//! FxHashMap/SmallVec re-exports, lasso-backed dictionary, column typing.

pub mod collections;
pub mod dictionary;
pub mod value_type;

pub use collections::{FxHashMap, FxHashSet, SmallVec};
pub use dictionary::StringDictionary;
pub use value_type::{HierarchyKind, OrderingKind, OrderingPolicy, ValueType};
