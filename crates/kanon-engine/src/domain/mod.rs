//! Domain values: raw scalars, intervals, synthetic labels and the sentinel.

pub mod interval;
pub mod scalar;
pub mod value;

pub use interval::{parse_range, IntervalValue};
pub use scalar::{format_date, parse_date, DateGranularity, Scalar};
pub use value::{is_missing, DomainValue, SyntheticLabel};
