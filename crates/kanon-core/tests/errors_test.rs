//! Tests for the kanon error handling system.

use std::collections::HashSet;

use kanon_core::errors::*;

fn all_generalization_errors() -> Vec<GeneralizationError> {
    vec![
        GeneralizationError::InvalidRange {
            lower: "5".into(),
            upper: "1".into(),
        },
        GeneralizationError::EmptyDomain,
        GeneralizationError::InvalidFanout { fanout: 0 },
        GeneralizationError::unknown_value("42"),
        GeneralizationError::parse("1-", "missing upper bound"),
        GeneralizationError::malformed(1, "x-y", "not a range"),
        GeneralizationError::UnknownColumn {
            column: "age".into(),
        },
        GeneralizationError::MissingHierarchy { column: 3 },
        GeneralizationError::invalid_transformation("arity 2, expected 3"),
        GeneralizationError::invalid_hierarchy("age", "duplicate value 7"),
    ]
}

#[test]
fn test_error_codes_are_distinct() {
    let codes: HashSet<&str> = all_generalization_errors()
        .iter()
        .map(|e| e.error_code())
        .collect();
    assert_eq!(codes.len(), all_generalization_errors().len());
}

#[test]
fn test_only_malformed_signature_is_fatal() {
    for err in all_generalization_errors() {
        let expected = matches!(err, GeneralizationError::MalformedSignature { .. });
        assert_eq!(err.is_fatal(), expected, "{err}");
    }
    let config = ConfigError::FileNotFound {
        path: "/nope".into(),
    };
    assert!(config.is_fatal());
}

#[test]
fn test_coded_string_format() {
    let err = GeneralizationError::InvalidFanout { fanout: 1 };
    assert_eq!(
        err.coded_string(),
        "[INVALID_FANOUT] Invalid fanout 1: must be at least 2"
    );
}

#[test]
fn test_display_carries_context() {
    let err = GeneralizationError::malformed(2, "abc", "not a number");
    let msg = err.to_string();
    assert!(msg.contains("abc"));
    assert!(msg.contains("column 2"));
}
