//! Bidirectional code <-> string dictionary for string and temporal columns.
//!
//! Backed by `lasso::Rodeo`: interning order defines the code, so the first
//! string interned gets code 0.

use lasso::{Key, Rodeo, Spur};

/// Dictionary mapping integer cell codes to their string values.
#[derive(Debug, Default)]
pub struct StringDictionary {
    inner: Rodeo,
}

impl StringDictionary {
    pub fn new() -> Self {
        Self {
            inner: Rodeo::default(),
        }
    }

    /// Intern a string, returning its code. Repeated strings share a code.
    pub fn intern(&mut self, value: &str) -> u32 {
        self.inner.get_or_intern(value).into_usize() as u32
    }

    /// Look up the code of a previously interned string without inserting.
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.inner.get(value).map(|key| key.into_usize() as u32)
    }

    /// Resolve a code back to its string.
    pub fn resolve(&self, code: u32) -> Option<&str> {
        let key = Spur::try_from_usize(code as usize)?;
        self.inner.try_resolve(&key)
    }

    /// Resolve a raw cell (codes are stored as `f64` in dataset columns).
    pub fn resolve_cell(&self, cell: f64) -> Option<&str> {
        if !cell.is_finite() || cell < 0.0 || cell.fract() != 0.0 {
            return None;
        }
        self.resolve(cell as u32)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate `(code, string)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.inner
            .iter()
            .map(|(key, value)| (key.into_usize() as u32, value))
    }
}

impl<S: AsRef<str>> FromIterator<S> for StringDictionary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut dict = Self::new();
        for value in iter {
            dict.intern(value.as_ref());
        }
        dict
    }
}
