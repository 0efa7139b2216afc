//! Frequency sets: generalized row signatures and their occurrence counts.
//!
//! A set is produced either by scanning the dataset ([`FrequencySet::compute`])
//! or by re-deriving it from an ancestor's set without touching the rows
//! ([`FrequencySet::compute_from_parent`]). Both paths conserve the row count.

mod incremental;
mod projection;
mod scan;

use std::fmt;
use std::sync::Arc;

use kanon_core::traits::Transformation;
use kanon_core::types::{FxHashMap, SmallVec};

/// One generalized row: a rendered value per quasi-identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Signature(SmallVec<[Arc<str>; 4]>);

impl Signature {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        values.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|v| &**v)
    }

    pub fn values(&self) -> &[Arc<str>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|v| &**v)
    }
}

impl<S: Into<Arc<str>>> FromIterator<S> for Signature {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            f.write_str(value)?;
        }
        write!(f, ")")
    }
}

/// Equivalence classes of one lattice node.
///
/// Immutable once returned; children derive their own sets from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySet {
    transformation: Transformation,
    counts: FxHashMap<Signature, u64>,
    row_count: usize,
}

impl FrequencySet {
    fn from_counts(transformation: Transformation, counts: FxHashMap<Signature, u64>, row_count: usize) -> Self {
        Self {
            transformation,
            counts,
            row_count,
        }
    }

    /// Generalization vector this set was computed for.
    pub fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    /// Number of distinct signatures (equivalence classes).
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Occurrences of `signature`; zero when absent.
    pub fn count(&self, signature: &Signature) -> u64 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, u64)> {
        self.counts.iter().map(|(sig, &count)| (sig, count))
    }

    /// Sum of all counts; equals `row_count` for every well-formed set.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Size of the smallest equivalence class.
    pub fn min_class_size(&self) -> Option<u64> {
        self.counts.values().copied().min()
    }

    /// Classes ordered by signature, for stable output.
    pub fn into_sorted_vec(self) -> Vec<(Signature, u64)> {
        let mut classes: Vec<_> = self.counts.into_iter().collect();
        classes.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_equality_is_structural() {
        let a = Signature::new(["A", "1"]);
        let b: Signature = vec![String::from("A"), String::from("1")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, Signature::new(["1", "A"]));
        assert_eq!(a.to_string(), "(A, 1)");
        assert_eq!(a.get(1), Some("1"));
        assert_eq!(a.iter().collect::<Vec<_>>(), ["A", "1"]);
    }

    #[test]
    fn test_inspection() {
        let mut counts = FxHashMap::default();
        counts.insert(Signature::new(["B"]), 1);
        counts.insert(Signature::new(["A"]), 2);
        let set = FrequencySet::from_counts(Transformation::bottom(1), counts, 3);
        assert_eq!(set.len(), 2);
        assert_eq!(set.total(), 3);
        assert_eq!(set.min_class_size(), Some(1));
        assert_eq!(set.count(&Signature::new(["A"])), 2);
        assert_eq!(set.count(&Signature::new(["C"])), 0);
        let sorted = set.into_sorted_vec();
        assert_eq!(sorted[0], (Signature::new(["A"]), 2));
    }
}
