//! Error handling for kanon.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod generalization_error;

pub use config_error::ConfigError;
pub use error_code::KanonErrorCode;
pub use generalization_error::{GeneralizationError, GeneralizationResult};
