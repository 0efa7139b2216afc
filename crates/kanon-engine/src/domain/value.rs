//! The closed set of values a hierarchy node or a dataset cell can take.

use std::fmt;

use kanon_core::constants::{MISSING_DISPLAY, MISSING_NUMERIC, MISSING_TEXT, SYNTHETIC_LABEL_PREFIX};
use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::types::{StringDictionary, ValueType};

use super::interval::IntervalValue;
use super::scalar::{parse_date, Scalar};

/// Identifier of a synthetic inner node minted during autogeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyntheticLabel(pub u64);

impl fmt::Display for SyntheticLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SYNTHETIC_LABEL_PREFIX}{}", self.0)
    }
}

/// Value of one quasi-identifier at some generalization level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainValue {
    /// Ungeneralized cell value; also the leaves of distinct hierarchies.
    Raw(Scalar),
    /// Node of a range hierarchy.
    Interval(IntervalValue),
    /// Inner node of an autogenerated distinct hierarchy.
    Label(SyntheticLabel),
    /// Missing or suppressed cell.
    Sentinel,
}

impl DomainValue {
    /// Decode a dataset cell: literal numbers for numeric columns, dictionary
    /// codes otherwise.
    pub fn from_cell(
        cell: f64,
        value_type: ValueType,
        dictionary: Option<&StringDictionary>,
    ) -> GeneralizationResult<Self> {
        if value_type == ValueType::Numeric {
            return Ok(Self::from_scalar(Scalar::Number(cell)));
        }
        let text = dictionary
            .and_then(|dict| dict.resolve_cell(cell))
            .ok_or_else(|| GeneralizationError::unknown_value(format!("dictionary code {cell}")))?;
        Self::from_text(text, value_type)
    }

    /// Parse the rendered form of a raw value, recognising the sentinel.
    pub fn from_text(text: &str, value_type: ValueType) -> GeneralizationResult<Self> {
        if text == MISSING_TEXT {
            return Ok(Self::Sentinel);
        }
        match value_type {
            ValueType::Temporal => parse_date(text).map(|d| Self::Raw(Scalar::Date(d))),
            _ => Scalar::parse(text, value_type).map(Self::from_scalar),
        }
    }

    pub fn from_scalar(scalar: Scalar) -> Self {
        if is_missing(&scalar) {
            Self::Sentinel
        } else {
            Self::Raw(scalar)
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }

    pub fn as_interval(&self) -> Option<&IntervalValue> {
        match self {
            Self::Interval(iv) => Some(iv),
            _ => None,
        }
    }
}

/// Whether a raw scalar is the missing/suppressed marker.
pub fn is_missing(scalar: &Scalar) -> bool {
    match scalar {
        Scalar::Number(v) => v.is_nan() || *v == MISSING_NUMERIC,
        Scalar::Text(s) => s == MISSING_TEXT,
        Scalar::Date(_) => false,
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(s) => s.fmt(f),
            Self::Interval(iv) => iv.fmt(f),
            Self::Label(label) => label.fmt(f),
            Self::Sentinel => f.write_str(MISSING_DISPLAY),
        }
    }
}

impl From<Scalar> for DomainValue {
    fn from(scalar: Scalar) -> Self {
        Self::from_scalar(scalar)
    }
}

impl From<IntervalValue> for DomainValue {
    fn from(interval: IntervalValue) -> Self {
        Self::Interval(interval)
    }
}

impl From<f64> for DomainValue {
    fn from(v: f64) -> Self {
        Self::from_scalar(Scalar::Number(v))
    }
}

impl From<&str> for DomainValue {
    fn from(s: &str) -> Self {
        Self::from_scalar(Scalar::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_sentinels() {
        assert!(DomainValue::from(f64::NAN).is_sentinel());
        assert!(DomainValue::from(2147483646.0).is_sentinel());
        assert!(!DomainValue::from(2147483645.0).is_sentinel());
        assert_eq!(DomainValue::Sentinel.to_string(), "NaN");
    }

    #[test]
    fn test_cells_resolve_through_dictionary() {
        let dict: StringDictionary = ["A", "NaN", "3/7/2001"].into_iter().collect();
        assert_eq!(
            DomainValue::from_cell(0.0, ValueType::String, Some(&dict)).unwrap(),
            DomainValue::from("A")
        );
        assert!(DomainValue::from_cell(1.0, ValueType::String, Some(&dict))
            .unwrap()
            .is_sentinel());
        assert!(DomainValue::from_cell(1.0, ValueType::Temporal, Some(&dict))
            .unwrap()
            .is_sentinel());
        let date = DomainValue::from_cell(2.0, ValueType::Temporal, Some(&dict)).unwrap();
        assert_eq!(date.to_string(), "3/7/2001");
        assert!(DomainValue::from_cell(9.0, ValueType::String, Some(&dict)).is_err());
        assert!(DomainValue::from_cell(0.0, ValueType::String, None).is_err());
    }

    #[test]
    fn test_label_display() {
        assert_eq!(DomainValue::Label(SyntheticLabel(12)).to_string(), "#12");
    }
}
