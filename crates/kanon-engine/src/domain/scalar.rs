//! Raw cell values after dictionary resolution.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate};
use kanon_core::errors::{GeneralizationError, GeneralizationResult};
use kanon_core::types::ValueType;

/// A raw, ungeneralized value of one quasi-identifier.
///
/// Numbers compare by `f64::total_cmp` with `-0.0` folded into `0.0`, so the
/// type can key hash maps and ordered sets.
#[derive(Debug, Clone)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Scalar {
    /// Parse the rendered form of a scalar of the given domain.
    pub fn parse(input: &str, value_type: ValueType) -> GeneralizationResult<Self> {
        match value_type {
            ValueType::Numeric => input
                .trim()
                .parse::<f64>()
                .map(Scalar::Number)
                .map_err(|e| GeneralizationError::parse(input, e.to_string())),
            ValueType::String => Ok(Scalar::Text(input.to_string())),
            ValueType::Temporal => parse_date(input).map(Scalar::Date),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Number(_) => ValueType::Numeric,
            Self::Text(_) => ValueType::String,
            Self::Date(_) => ValueType::Temporal,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Date(_) => 2,
        }
    }
}

fn normalized(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => normalized(*a).total_cmp(&normalized(*b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Number(v) => normalized(*v).to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", normalized(*v)),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => f.write_str(&format_date(*d, DateGranularity::Day)),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<NaiveDate> for Scalar {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// Rendering granularity for dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGranularity {
    Year,
    Month,
    Day,
}

impl DateGranularity {
    /// Granularity used when rendering an interval at a hierarchy level:
    /// 0 → year, 1 → month/year, deeper → day/month/year.
    pub fn for_level(level: usize) -> Self {
        match level {
            0 => Self::Year,
            1 => Self::Month,
            _ => Self::Day,
        }
    }
}

/// Render a date as `yyyy`, `m/yyyy` or `d/m/yyyy` (no zero padding).
pub fn format_date(date: NaiveDate, granularity: DateGranularity) -> String {
    match granularity {
        DateGranularity::Year => date.year().to_string(),
        DateGranularity::Month => format!("{}/{}", date.month(), date.year()),
        DateGranularity::Day => format!("{}/{}/{}", date.day(), date.month(), date.year()),
    }
}

/// Parse a `d/m/yyyy` date; one- or two-digit day and month are accepted.
pub fn parse_date(input: &str) -> GeneralizationResult<NaiveDate> {
    let trimmed = input.trim();
    let mut parts = trimmed.split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(GeneralizationError::parse(input, "expected d/m/yyyy"));
    };
    let day: u32 = day
        .parse()
        .map_err(|_| GeneralizationError::parse(input, "invalid day"))?;
    let month: u32 = month
        .parse()
        .map_err(|_| GeneralizationError::parse(input, "invalid month"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| GeneralizationError::parse(input, "invalid year"))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| GeneralizationError::parse(input, "date out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Scalar::Number(-0.0), Scalar::Number(0.0));
        let mut set = kanon_core::types::FxHashSet::default();
        set.insert(Scalar::Number(-0.0));
        assert!(set.contains(&Scalar::Number(0.0)));
        assert_eq!(Scalar::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn test_number_display_round_trips() {
        for v in [20.0, 25.5, -3.0, 1e-7, 123456789.125] {
            let rendered = Scalar::Number(v).to_string();
            assert_eq!(Scalar::parse(&rendered, ValueType::Numeric).unwrap(), Scalar::Number(v));
        }
        assert_eq!(Scalar::Number(20.0).to_string(), "20");
    }

    #[test]
    fn test_date_parse_accepts_padding() {
        let d = parse_date("03/07/2001").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2001, 7, 3).unwrap());
        assert_eq!(parse_date("3/7/2001").unwrap(), d);
        assert_eq!(Scalar::Date(d).to_string(), "3/7/2001");
    }

    #[test]
    fn test_date_parse_rejects_garbage() {
        assert!(parse_date("2001-07-03").is_err());
        assert!(parse_date("31/2/2001").is_err());
        assert!(parse_date("1/2/3/4").is_err());
    }

    #[test]
    fn test_ordering_within_domain() {
        assert!(Scalar::Number(-1.0) < Scalar::Number(2.0));
        assert!(Scalar::from("apple") < Scalar::from("banana"));
        let a = Scalar::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let b = Scalar::Date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap());
        assert!(b < a);
    }
}
