//! Top-level kanon configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnonymityConfig, FrequencyConfig, HierarchyConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;
use crate::types::{HierarchyKind, OrderingKind};

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`KANON_*`)
/// 3. Project config (`kanon.toml` in the project root)
/// 4. User config (`~/.kanon/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct KanonConfig {
    pub hierarchy: HierarchyConfig,
    pub anonymity: AnonymityConfig,
    pub frequency: FrequencyConfig,
}

/// Override arguments supplied by an embedding driver.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub fanout: Option<usize>,
    pub ordering: Option<OrderingKind>,
    pub seed: Option<u64>,
    pub k: Option<u32>,
}

impl KanonConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(path = %user_config_path.display(), error = %err, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &KanonConfig) -> Result<(), ConfigError> {
        if let Some(fanout) = config.hierarchy.fanout {
            if fanout < 2 {
                return Err(ConfigError::ValidationFailed {
                    field: "hierarchy.fanout".to_string(),
                    message: "must be at least 2".to_string(),
                });
            }
        }
        if let Some(k) = config.anonymity.k {
            if k == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "anonymity.k".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if config.hierarchy.ordering.is_some()
            && config.hierarchy.ordering != Some(OrderingKind::Natural)
            && config.hierarchy.kind == Some(HierarchyKind::Range)
        {
            return Err(ConfigError::ValidationFailed {
                field: "hierarchy.ordering".to_string(),
                message: "range hierarchies only support natural ordering".to_string(),
            });
        }
        if let Some(threshold) = config.frequency.parallel_threshold {
            if threshold == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "frequency.parallel_threshold".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.kanon/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut KanonConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: KanonConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut KanonConfig, other: &KanonConfig) {
        // Hierarchy
        if other.hierarchy.fanout.is_some() {
            base.hierarchy.fanout = other.hierarchy.fanout;
        }
        if other.hierarchy.ordering.is_some() {
            base.hierarchy.ordering = other.hierarchy.ordering;
        }
        if other.hierarchy.seed.is_some() {
            base.hierarchy.seed = other.hierarchy.seed;
        }
        if other.hierarchy.kind.is_some() {
            base.hierarchy.kind = other.hierarchy.kind;
        }

        // Anonymity
        if other.anonymity.k.is_some() {
            base.anonymity.k = other.anonymity.k;
        }

        // Frequency
        if other.frequency.parallel_siblings.is_some() {
            base.frequency.parallel_siblings = other.frequency.parallel_siblings;
        }
        if other.frequency.parallel_threshold.is_some() {
            base.frequency.parallel_threshold = other.frequency.parallel_threshold;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `KANON_HIERARCHY_FANOUT`, `KANON_ANONYMITY_K`, etc.
    fn apply_env_overrides(config: &mut KanonConfig) {
        if let Ok(val) = std::env::var("KANON_HIERARCHY_FANOUT") {
            if let Ok(v) = val.parse::<usize>() {
                config.hierarchy.fanout = Some(v);
            }
        }
        if let Ok(val) = std::env::var("KANON_HIERARCHY_ORDERING") {
            match val.to_ascii_lowercase().as_str() {
                "natural" => config.hierarchy.ordering = Some(OrderingKind::Natural),
                "shuffled" => config.hierarchy.ordering = Some(OrderingKind::Shuffled),
                "lexicographic" => config.hierarchy.ordering = Some(OrderingKind::Lexicographic),
                other => tracing::warn!(value = other, "ignoring unknown KANON_HIERARCHY_ORDERING"),
            }
        }
        if let Ok(val) = std::env::var("KANON_HIERARCHY_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.hierarchy.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("KANON_HIERARCHY_KIND") {
            match val.to_ascii_lowercase().as_str() {
                "distinct" => config.hierarchy.kind = Some(HierarchyKind::Distinct),
                "range" => config.hierarchy.kind = Some(HierarchyKind::Range),
                other => tracing::warn!(value = other, "ignoring unknown KANON_HIERARCHY_KIND"),
            }
        }
        if let Ok(val) = std::env::var("KANON_ANONYMITY_K") {
            if let Ok(v) = val.parse::<u32>() {
                config.anonymity.k = Some(v);
            }
        }
        if let Ok(val) = std::env::var("KANON_FREQUENCY_PARALLEL_SIBLINGS") {
            if let Ok(v) = val.parse::<bool>() {
                config.frequency.parallel_siblings = Some(v);
            }
        }
        if let Ok(val) = std::env::var("KANON_FREQUENCY_PARALLEL_THRESHOLD") {
            if let Ok(v) = val.parse::<usize>() {
                config.frequency.parallel_threshold = Some(v);
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut KanonConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.fanout {
            config.hierarchy.fanout = Some(v);
        }
        if let Some(v) = overrides.ordering {
            config.hierarchy.ordering = Some(v);
        }
        if let Some(v) = overrides.seed {
            config.hierarchy.seed = Some(v);
        }
        if let Some(v) = overrides.k {
            config.anonymity.k = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level kanon config directory: `~/.kanon/`.
fn dirs_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".kanon"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
