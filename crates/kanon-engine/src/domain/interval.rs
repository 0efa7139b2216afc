//! Closed intervals over numeric and temporal domains.

use std::fmt;

use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::types::ValueType;

use super::scalar::{format_date, DateGranularity, Scalar};

/// A closed interval `[lower, upper]` used as a range-hierarchy node.
///
/// Both bounds share one domain (numbers or dates), numbers are finite, and
/// `lower <= upper`. Equality and hashing go through the bound pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalValue {
    lower: Scalar,
    upper: Scalar,
}

impl IntervalValue {
    pub fn new(lower: impl Into<Scalar>, upper: impl Into<Scalar>) -> GeneralizationResult<Self> {
        let (lower, upper) = (lower.into(), upper.into());
        let valid = match (&lower, &upper) {
            (Scalar::Number(lo), Scalar::Number(hi)) => lo.is_finite() && hi.is_finite(),
            (Scalar::Date(_), Scalar::Date(_)) => true,
            _ => false,
        };
        if !valid || lower > upper {
            return Err(GeneralizationError::InvalidRange {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        Ok(Self { lower, upper })
    }

    /// Degenerate interval holding exactly one value.
    pub fn point(value: impl Into<Scalar>) -> GeneralizationResult<Self> {
        let value = value.into();
        Self::new(value.clone(), value)
    }

    pub fn lower(&self) -> &Scalar {
        &self.lower
    }

    pub fn upper(&self) -> &Scalar {
        &self.upper
    }

    pub fn value_type(&self) -> ValueType {
        self.lower.value_type()
    }

    /// `lower <= v <= upper`. Values of another domain are never contained.
    pub fn contains_inclusive(&self, value: &Scalar) -> bool {
        self.same_domain(value) && &self.lower <= value && value <= &self.upper
    }

    /// `lower <= v < upper`. A degenerate interval contains nothing.
    pub fn contains_right_open(&self, value: &Scalar) -> bool {
        self.same_domain(value) && &self.lower <= value && value < &self.upper
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn encloses(&self, other: &IntervalValue) -> bool {
        self.contains_inclusive(&other.lower) && self.contains_inclusive(&other.upper)
    }

    /// Smallest interval covering both.
    pub fn span(&self, other: &IntervalValue) -> GeneralizationResult<Self> {
        let lower = self.lower.clone().min(other.lower.clone());
        let upper = self.upper.clone().max(other.upper.clone());
        Self::new(lower, upper)
    }

    /// `low-high`, with dates rendered at the granularity of `level`.
    pub fn to_display_string(&self, level: usize) -> String {
        self.render(level, '-')
    }

    /// `low,high`, with dates rendered at the granularity of `level`.
    pub fn to_export_string(&self, level: usize) -> String {
        self.render(level, ',')
    }

    fn render(&self, level: usize, separator: char) -> String {
        match (&self.lower, &self.upper) {
            (Scalar::Date(lo), Scalar::Date(hi)) => {
                let granularity = DateGranularity::for_level(level);
                format!(
                    "{}{separator}{}",
                    format_date(*lo, granularity),
                    format_date(*hi, granularity)
                )
            }
            (lo, hi) => format!("{lo}{separator}{hi}"),
        }
    }

    fn same_domain(&self, value: &Scalar) -> bool {
        std::mem::discriminant(&self.lower) == std::mem::discriminant(value)
    }
}

impl fmt::Display for IntervalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

/// Parse the default display form (`low-high`) back into an interval.
///
/// Numeric bounds may be negative: the separator is the first `-` that does
/// not start a number or belong to an exponent.
pub fn parse_range(input: &str, value_type: ValueType) -> GeneralizationResult<IntervalValue> {
    let trimmed = input.trim();
    let (lower, upper) = match value_type {
        ValueType::Numeric => split_numeric(trimmed),
        ValueType::Temporal => trimmed.split_once('-'),
        ValueType::String => {
            return Err(GeneralizationError::parse(input, "string columns have no ranges"));
        }
    }
    .ok_or_else(|| GeneralizationError::parse(input, "expected low-high"))?;

    let lower = Scalar::parse(lower, value_type)?;
    let upper = Scalar::parse(upper, value_type)?;
    IntervalValue::new(lower, upper)
        .map_err(|e| GeneralizationError::parse(input, e.to_string()))
}

fn split_numeric(input: &str) -> Option<(&str, &str)> {
    let bytes = input.as_bytes();
    (1..bytes.len())
        .find(|&i| bytes[i] == b'-' && !matches!(bytes[i - 1], b'e' | b'E' | b'-'))
        .map(|i| (&input[..i], &input[i + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Scalar {
        Scalar::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_rejects_reversed_bounds() {
        let err = IntervalValue::new(5.0, 1.0).unwrap_err();
        assert!(matches!(err, GeneralizationError::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_mixed_and_text_bounds() {
        assert!(IntervalValue::new(1.0, date(2000, 1, 1)).is_err());
        assert!(IntervalValue::new("a", "b").is_err());
        assert!(IntervalValue::new(f64::NAN, 1.0).is_err());
        assert!(IntervalValue::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_membership_variants_differ_at_upper_bound() {
        let iv = IntervalValue::new(20.0, 25.0).unwrap();
        let upper = Scalar::Number(25.0);
        assert!(iv.contains_inclusive(&upper));
        assert!(!iv.contains_right_open(&upper));
        assert!(iv.contains_right_open(&Scalar::Number(20.0)));
        assert!(!iv.contains_inclusive(&Scalar::Number(25.5)));
        assert!(!iv.contains_inclusive(&Scalar::from("20")));
    }

    #[test]
    fn test_degenerate_interval() {
        let iv = IntervalValue::point(40.0).unwrap();
        assert!(iv.contains_inclusive(&Scalar::Number(40.0)));
        assert!(!iv.contains_right_open(&Scalar::Number(40.0)));
        assert_eq!(iv.to_string(), "40-40");
    }

    #[test]
    fn test_date_granularity_by_level() {
        let iv = IntervalValue::new(date(2001, 3, 7), date(2004, 11, 20)).unwrap();
        assert_eq!(iv.to_display_string(0), "2001-2004");
        assert_eq!(iv.to_display_string(1), "3/2001-11/2004");
        assert_eq!(iv.to_display_string(2), "7/3/2001-20/11/2004");
        assert_eq!(iv.to_display_string(7), "7/3/2001-20/11/2004");
        assert_eq!(iv.to_export_string(1), "3/2001,11/2004");
        assert_eq!(iv.to_string(), "7/3/2001-20/11/2004");
    }

    #[test]
    fn test_numeric_display_ignores_level() {
        let iv = IntervalValue::new(-3.5, 10.0).unwrap();
        assert_eq!(iv.to_display_string(0), "-3.5-10");
        assert_eq!(iv.to_display_string(3), "-3.5-10");
        assert_eq!(iv.to_export_string(0), "-3.5,10");
    }

    #[test]
    fn test_parse_range_inverts_display() {
        for iv in [
            IntervalValue::new(20.0, 25.0).unwrap(),
            IntervalValue::new(-10.0, -2.5).unwrap(),
            IntervalValue::new(-1.0, 3.0).unwrap(),
            IntervalValue::new(0.000001, 1e12).unwrap(),
        ] {
            assert_eq!(parse_range(&iv.to_string(), ValueType::Numeric).unwrap(), iv);
        }
        let dates = IntervalValue::new(date(1999, 12, 31), date(2000, 1, 1)).unwrap();
        assert_eq!(parse_range(&dates.to_string(), ValueType::Temporal).unwrap(), dates);
    }

    #[test]
    fn test_parse_range_accepts_exponent_notation() {
        let iv = parse_range("1e-5-2", ValueType::Numeric).unwrap();
        assert_eq!(iv.lower(), &Scalar::Number(1e-5));
        assert_eq!(iv.upper(), &Scalar::Number(2.0));
    }

    #[test]
    fn test_parse_range_rejects_malformed() {
        for input in ["", "20", "20-", "-20", "a-b", "30-20", "20-25-30"] {
            let err = parse_range(input, ValueType::Numeric).unwrap_err();
            assert!(matches!(err, GeneralizationError::ParseError { .. }), "{input}: {err}");
        }
        assert!(parse_range("1/1/2000", ValueType::Temporal).is_err());
        assert!(parse_range("a-b", ValueType::String).is_err());
    }
}
