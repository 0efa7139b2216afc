//! Frequency set computation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PARALLEL_SIBLING_THRESHOLD;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Compute sibling lattice nodes on the rayon pool. Default: true.
    pub parallel_siblings: Option<bool>,
    /// Sibling count below which computation stays on the calling thread. Default: 4.
    pub parallel_threshold: Option<usize>,
}

impl FrequencyConfig {
    pub fn effective_parallel_siblings(&self) -> bool {
        self.parallel_siblings.unwrap_or(true)
    }

    pub fn effective_parallel_threshold(&self) -> usize {
        self.parallel_threshold
            .unwrap_or(DEFAULT_PARALLEL_SIBLING_THRESHOLD)
    }
}
