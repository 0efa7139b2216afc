//! Tests for the kanon configuration system.

use std::sync::Mutex;

use kanon_core::config::{ConfigOverrides, KanonConfig};
use kanon_core::errors::ConfigError;
use kanon_core::types::{HierarchyKind, OrderingKind, OrderingPolicy};

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all KANON_ env vars and point HOME at an empty directory so a
/// developer's user config cannot leak into the tests.
fn isolate_env(home: &std::path::Path) {
    for key in [
        "KANON_HIERARCHY_FANOUT",
        "KANON_HIERARCHY_ORDERING",
        "KANON_HIERARCHY_SEED",
        "KANON_ANONYMITY_K",
        "KANON_HIERARCHY_KIND",
        "KANON_FREQUENCY_PARALLEL_SIBLINGS",
        "KANON_FREQUENCY_PARALLEL_THRESHOLD",
    ] {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
    std::env::remove_var("USERPROFILE");
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(
        dir.path().join("kanon.toml"),
        r#"
[hierarchy]
fanout = 4
ordering = "shuffled"
seed = 11

[anonymity]
k = 3
"#,
    )
    .unwrap();

    // Env beats the project file for fanout.
    std::env::set_var("KANON_HIERARCHY_FANOUT", "6");

    // Overrides beat everything for k.
    let overrides = ConfigOverrides {
        k: Some(10),
        ..Default::default()
    };

    let config = KanonConfig::load(dir.path(), Some(&overrides)).unwrap();
    assert_eq!(config.hierarchy.fanout, Some(6));
    assert_eq!(config.anonymity.k, Some(10));
    assert_eq!(
        config.hierarchy.effective_ordering(),
        OrderingPolicy::Shuffled { seed: 11 }
    );

    std::env::remove_var("KANON_HIERARCHY_FANOUT");
}

#[test]
fn test_user_config_is_lowest_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::fs::create_dir_all(home.path().join(".kanon")).unwrap();
    std::fs::write(
        home.path().join(".kanon/config.toml"),
        "[hierarchy]\nfanout = 8\nseed = 5\n",
    )
    .unwrap();

    let dir = tempdir();
    std::fs::write(dir.path().join("kanon.toml"), "[hierarchy]\nfanout = 3\n").unwrap();

    let config = KanonConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.hierarchy.fanout, Some(3));
    assert_eq!(config.hierarchy.seed, Some(5));
}

#[test]
fn test_load_missing_files_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    let config = KanonConfig::load(dir.path(), None).unwrap();

    assert_eq!(config, KanonConfig::default());
    assert_eq!(config.hierarchy.effective_fanout(), 2);
    assert_eq!(config.hierarchy.effective_ordering(), OrderingPolicy::Natural);
    assert_eq!(config.hierarchy.effective_kind(), HierarchyKind::Distinct);
    assert_eq!(config.anonymity.effective_k(), 2);
    assert!(config.frequency.effective_parallel_siblings());
    assert_eq!(config.frequency.effective_parallel_threshold(), 4);
}

#[test]
fn test_env_ordering_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::env::set_var("KANON_HIERARCHY_ORDERING", "Lexicographic");
    let config = KanonConfig::load(tempdir().path(), None).unwrap();
    assert_eq!(config.hierarchy.ordering, Some(OrderingKind::Lexicographic));

    std::env::set_var("KANON_HIERARCHY_ORDERING", "sideways");
    let config = KanonConfig::load(tempdir().path(), None).unwrap();
    assert_eq!(config.hierarchy.ordering, None);

    std::env::remove_var("KANON_HIERARCHY_ORDERING");
}

#[test]
fn test_env_covers_kind_and_parallel_threshold() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(
        dir.path().join("kanon.toml"),
        "[frequency]\nparallel_threshold = 16\n",
    )
    .unwrap();

    std::env::set_var("KANON_HIERARCHY_KIND", "Range");
    std::env::set_var("KANON_FREQUENCY_PARALLEL_THRESHOLD", "2");
    let config = KanonConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.hierarchy.kind, Some(HierarchyKind::Range));
    assert_eq!(config.frequency.effective_parallel_threshold(), 2);

    std::env::set_var("KANON_FREQUENCY_PARALLEL_THRESHOLD", "many");
    let config = KanonConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.frequency.parallel_threshold, Some(16));

    std::env::remove_var("KANON_HIERARCHY_KIND");
    std::env::remove_var("KANON_FREQUENCY_PARALLEL_THRESHOLD");
}

#[test]
fn test_invalid_project_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(dir.path().join("kanon.toml"), "[hierarchy\nfanout = ").unwrap();

    let err = KanonConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_validation_rejects_bad_values() {
    let err = KanonConfig::from_toml("[hierarchy]\nfanout = 1\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "hierarchy.fanout")
    );

    let err = KanonConfig::from_toml("[anonymity]\nk = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "anonymity.k"));

    let err =
        KanonConfig::from_toml("[hierarchy]\nkind = \"range\"\nordering = \"shuffled\"\n")
            .unwrap_err();
    assert!(
        matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "hierarchy.ordering")
    );
}

#[test]
fn test_toml_round_trip() {
    let config = KanonConfig::from_toml(
        "[hierarchy]\nfanout = 5\nkind = \"range\"\n\n[frequency]\nparallel_siblings = false\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let reparsed = KanonConfig::from_toml(&rendered).unwrap();
    assert_eq!(config, reparsed);
    assert_eq!(reparsed.hierarchy.effective_kind(), HierarchyKind::Range);
    assert!(!reparsed.frequency.effective_parallel_siblings());
}
