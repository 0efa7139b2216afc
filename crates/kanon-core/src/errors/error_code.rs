//! KanonErrorCode trait for classifying failures at the search-layer boundary.

/// Every kanon error enum exposes a stable code string so the search layer
/// can decide whether a failure ends the run or only discards one
/// hierarchy definition.
pub trait KanonErrorCode {
    /// Returns the error code string (e.g., "UNKNOWN_VALUE").
    fn error_code(&self) -> &'static str;

    /// Whether the failure invalidates the whole run rather than a single
    /// hierarchy or lattice node.
    fn is_fatal(&self) -> bool {
        false
    }

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const INVALID_RANGE: &str = "INVALID_RANGE";
pub const EMPTY_DOMAIN: &str = "EMPTY_DOMAIN";
pub const INVALID_FANOUT: &str = "INVALID_FANOUT";
pub const UNKNOWN_VALUE: &str = "UNKNOWN_VALUE";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const MALFORMED_SIGNATURE: &str = "MALFORMED_SIGNATURE";
pub const UNKNOWN_COLUMN: &str = "UNKNOWN_COLUMN";
pub const MISSING_HIERARCHY: &str = "MISSING_HIERARCHY";
pub const INVALID_TRANSFORMATION: &str = "INVALID_TRANSFORMATION";
pub const INVALID_HIERARCHY: &str = "INVALID_HIERARCHY";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
