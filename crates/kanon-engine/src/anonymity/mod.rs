//! k-anonymity predicate over a frequency set.

use serde::Serialize;

use kanon_core::config::AnonymityConfig;

use crate::frequency::FrequencySet;

/// True iff every equivalence class holds at least `k` rows. Stops at the
/// first violation.
pub fn is_k_anonymous(set: &FrequencySet, k: u32) -> bool {
    let k = u64::from(k);
    set.iter().all(|(_, count)| count >= k)
}

/// Summary of how far a set is from k-anonymity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymityReport {
    pub k: u32,
    pub is_anonymous: bool,
    pub equivalence_classes: usize,
    pub min_class_size: Option<u64>,
    pub violating_classes: usize,
    /// Rows that would have to be suppressed to reach k.
    pub rows_below_k: u64,
}

/// Checker bound to one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnonymityChecker {
    k: u32,
}

impl AnonymityChecker {
    pub fn new(k: u32) -> Self {
        Self { k }
    }

    pub fn from_config(config: &AnonymityConfig) -> Self {
        Self::new(config.effective_k())
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn check(&self, set: &FrequencySet) -> bool {
        is_k_anonymous(set, self.k)
    }

    pub fn report(&self, set: &FrequencySet) -> AnonymityReport {
        let k = u64::from(self.k);
        let (violating_classes, rows_below_k) = set
            .iter()
            .filter(|&(_, count)| count < k)
            .fold((0, 0), |(classes, rows), (_, count)| (classes + 1, rows + count));
        let report = AnonymityReport {
            k: self.k,
            is_anonymous: violating_classes == 0,
            equivalence_classes: set.len(),
            min_class_size: set.min_class_size(),
            violating_classes,
            rows_below_k,
        };
        tracing::debug!(
            transformation = %set.transformation(),
            k = self.k,
            is_anonymous = report.is_anonymous,
            violating_classes,
            "anonymity checked"
        );
        report
    }
}
