//! Configuration system for kanon.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod anonymity_config;
pub mod frequency_config;
pub mod hierarchy_config;
pub mod kanon_config;

pub use anonymity_config::AnonymityConfig;
pub use frequency_config::FrequencyConfig;
pub use hierarchy_config::HierarchyConfig;
pub use kanon_config::{ConfigOverrides, KanonConfig};
