//! Shared constants for the kanon generalization engine.

/// Default group size used when autogenerating hierarchies.
pub const DEFAULT_FANOUT: usize = 2;

/// Default k for the anonymity threshold.
pub const DEFAULT_K: u32 = 2;

/// Default seed for the shuffled ordering policy.
pub const DEFAULT_SHUFFLE_SEED: u64 = 0;

/// Minimum number of sibling nodes before sibling computation goes parallel.
pub const DEFAULT_PARALLEL_SIBLING_THRESHOLD: usize = 4;

/// Reserved numeric code marking a missing or suppressed cell.
pub const MISSING_NUMERIC: f64 = 2_147_483_646.0;

/// Dictionary string marking a missing or suppressed cell.
pub const MISSING_TEXT: &str = "NaN";

/// Rendering of a missing cell inside a generalized signature.
pub const MISSING_DISPLAY: &str = "NaN";

/// Prefix of synthetic hierarchy labels (`#1`, `#2`, ...).
pub const SYNTHETIC_LABEL_PREFIX: char = '#';

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = "kanon.toml";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "KANON_LOG";
