//! Errors raised while building hierarchies and computing frequency sets.

use super::error_code::{self, KanonErrorCode};

/// Result alias used throughout the engine.
pub type GeneralizationResult<T> = Result<T, GeneralizationError>;

/// Local, deterministic failures of the generalization core.
///
/// None of these are retried: re-running with the same inputs cannot change
/// the outcome. They reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneralizationError {
    #[error("Invalid range [{lower}, {upper}]: bounds must be ordered values of one numeric or temporal domain")]
    InvalidRange { lower: String, upper: String },

    #[error("Cannot build a hierarchy over an empty domain")]
    EmptyDomain,

    #[error("Invalid fanout {fanout}: must be at least 2")]
    InvalidFanout { fanout: usize },

    #[error("Value {value} is not part of the hierarchy")]
    UnknownValue { value: String },

    #[error("Cannot parse {input:?}: {message}")]
    ParseError { input: String, message: String },

    #[error("Malformed signature component {value:?} in column {column}: {message}")]
    MalformedSignature {
        column: usize,
        value: String,
        message: String,
    },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("No hierarchy registered for column {column}")]
    MissingHierarchy { column: usize },

    #[error("Invalid transformation: {message}")]
    InvalidTransformation { message: String },

    #[error("Invalid hierarchy {name}: {message}")]
    InvalidHierarchy { name: String, message: String },
}

impl GeneralizationError {
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn unknown_value(value: impl std::fmt::Display) -> Self {
        Self::UnknownValue {
            value: value.to_string(),
        }
    }

    pub fn malformed(column: usize, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSignature {
            column,
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn invalid_hierarchy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHierarchy {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_transformation(message: impl Into<String>) -> Self {
        Self::InvalidTransformation {
            message: message.into(),
        }
    }
}

impl KanonErrorCode for GeneralizationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => error_code::INVALID_RANGE,
            Self::EmptyDomain => error_code::EMPTY_DOMAIN,
            Self::InvalidFanout { .. } => error_code::INVALID_FANOUT,
            Self::UnknownValue { .. } => error_code::UNKNOWN_VALUE,
            Self::ParseError { .. } => error_code::PARSE_ERROR,
            Self::MalformedSignature { .. } => error_code::MALFORMED_SIGNATURE,
            Self::UnknownColumn { .. } => error_code::UNKNOWN_COLUMN,
            Self::MissingHierarchy { .. } => error_code::MISSING_HIERARCHY,
            Self::InvalidTransformation { .. } => error_code::INVALID_TRANSFORMATION,
            Self::InvalidHierarchy { .. } => error_code::INVALID_HIERARCHY,
        }
    }

    /// A malformed stored signature means an ancestor's frequency set is
    /// corrupt; every descendant in the lattice depends on it.
    fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedSignature { .. })
    }
}
