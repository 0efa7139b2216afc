//! Anonymity threshold configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_K;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnonymityConfig {
    /// Minimum equivalence class size. Default: 2.
    pub k: Option<u32>,
}

impl AnonymityConfig {
    pub fn effective_k(&self) -> u32 {
        self.k.unwrap_or(DEFAULT_K)
    }
}
