//! Lattice node abstraction: a generalization vector, one step count per
//! quasi-identifier.

use std::fmt;

use crate::types::collections::SmallVec8;

/// A point in the generalization lattice. Owned by the search layer; the
/// engine only reads the vector.
pub trait LatticeNode {
    fn transformation(&self) -> &[u32];
}

/// Plain generalization vector for callers without a lattice type of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Transformation(SmallVec8<u32>);

impl Transformation {
    pub fn new(steps: impl IntoIterator<Item = u32>) -> Self {
        Self(steps.into_iter().collect())
    }

    /// The all-zero vector of the given arity (the lattice bottom).
    pub fn bottom(arity: usize) -> Self {
        Self(std::iter::repeat(0).take(arity).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Component-wise `self >= other`; false for vectors of different arity.
    pub fn dominates(&self, other: &[u32]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a >= b)
    }

    /// Total number of generalization steps (the lattice height of the node).
    pub fn level(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Copy of this vector with one more step on `column`.
    pub fn successor(&self, column: usize) -> Self {
        let mut next = self.clone();
        if let Some(step) = next.0.get_mut(column) {
            *step += 1;
        }
        next
    }
}

impl LatticeNode for Transformation {
    fn transformation(&self) -> &[u32] {
        &self.0
    }
}

impl LatticeNode for [u32] {
    fn transformation(&self) -> &[u32] {
        self
    }
}

impl LatticeNode for Vec<u32> {
    fn transformation(&self) -> &[u32] {
        self
    }
}

impl<const N: usize> LatticeNode for [u32; N] {
    fn transformation(&self) -> &[u32] {
        self
    }
}

impl From<Vec<u32>> for Transformation {
    fn from(steps: Vec<u32>) -> Self {
        Self::new(steps)
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{step}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominates_is_component_wise() {
        let t = Transformation::new([2, 1]);
        assert!(t.dominates(&[1, 1]));
        assert!(t.dominates(&[2, 1]));
        assert!(!t.dominates(&[0, 2]));
        assert!(!t.dominates(&[0]));
    }

    #[test]
    fn test_successor_and_level() {
        let t = Transformation::bottom(3).successor(1).successor(1);
        assert_eq!(t.transformation(), &[0, 2, 0]);
        assert_eq!(t.level(), 2);
        assert_eq!(t.to_string(), "[0,2,0]");
    }
}
