//! Core types, traits, errors, config, tracing, and constants for the kanon
//! generalization engine.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
