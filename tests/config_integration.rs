//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `sift.toml` files load, validate, and feed the
//! query façade.

use std::io::Write;

use pretty_assertions::assert_eq;

use sift::prelude::*;
use sift::schema::{FilterConfig, SchemaError};

#[derive(Debug, Clone)]
struct Item {
    id: i64,
}

sift::entity! {
    Item as "Items" {
        "Id" => id: Int,
    }
}

/// Test that an empty file yields defaults
#[test]
fn test_config_empty() {
    let config = SiftConfig::from_str("").expect("Failed to parse config");
    assert_eq!(config.filter, FilterConfig::default());
    assert!(!config.debug.log_filters);
}

/// Test full configuration with all options
#[test]
fn test_config_full() {
    let config_str = r#"
        [filter]
        max_criteria = 16
        max_payload_bytes = 4096

        [debug]
        log_filters = true

        [environments.production.filter]
        max_criteria = 8

        [environments.production.debug]
        log_filters = false
    "#;

    let config = SiftConfig::from_str(config_str).expect("Failed to parse config");
    assert_eq!(config.filter.max_criteria, 16);
    assert_eq!(config.filter.max_payload_bytes, 4096);
    assert!(config.debug.log_filters);

    let production = config.with_environment("production").unwrap();
    assert_eq!(production.filter.max_criteria, 8);
    assert_eq!(production.filter.max_payload_bytes, 4096);
    assert!(!production.debug.log_filters);
}

/// Test that unknown environments leave the config untouched
#[test]
fn test_config_unknown_environment() {
    let config = SiftConfig::from_str("[filter]\nmax_criteria = 3").unwrap();
    let staging = config.clone().with_environment("staging").unwrap();
    assert_eq!(staging.filter, config.filter);
}

/// Test zero limits are rejected
#[test]
fn test_config_zero_limit_rejected() {
    let result = SiftConfig::from_str("[filter]\nmax_criteria = 0");
    assert!(matches!(result, Err(SchemaError::ConfigError { .. })));
}

/// Test zero limits coming from an environment override are rejected
#[test]
fn test_config_zero_limit_in_environment_rejected() {
    let config = SiftConfig::from_str("[environments.prod.filter]\nmax_criteria = 0")
        .expect("base config is valid");
    let result = config.with_environment("prod");
    assert!(matches!(result, Err(SchemaError::ConfigError { .. })));
}

/// Test loading from a file on disk
#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[filter]\nmax_payload_bytes = 128").unwrap();

    let config = SiftConfig::from_file(file.path()).unwrap();
    assert_eq!(config.filter.max_payload_bytes, 128);
    assert_eq!(config.filter.max_criteria, 64);
}

/// Test a missing file reports its path
#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sift.toml");
    match SiftConfig::from_file(&path) {
        Err(SchemaError::IoError { path: reported, .. }) => {
            assert!(reported.ends_with("sift.toml"));
        }
        other => panic!("expected IoError, got {:?}", other),
    }
}

/// Test environment variable expansion
#[test]
fn test_config_env_expansion() {
    // SAFETY: Variable name is unique to this test
    unsafe {
        std::env::set_var("SIFT_TEST_MAX_CRITERIA", "5");
    }
    let config = SiftConfig::from_str("[filter]\nmax_criteria = ${SIFT_TEST_MAX_CRITERIA}").unwrap();
    assert_eq!(config.filter.max_criteria, 5);
}

/// Test configured limits reach the façade
#[test]
fn test_config_limits_reach_facade() {
    let config = SiftConfig::from_str("[filter]\nmax_criteria = 1").unwrap();
    let query = EntityQuery::<Item, _>::with_config(AllowAll, &config);
    let items = MemoryQuery::from(vec![Item { id: 1 }, Item { id: 2 }]);
    let who = Principal::new("t", "u");

    let one = r#"[{"Property":"Id","Operator":"=","Value":2}]"#;
    assert_eq!(query.find_many(&who, &items, Some(one)).unwrap().len(), 1);

    let two = r#"[{"Property":"Id","Operator":"=","Value":1},{"Property":"Id","Operator":"=","Value":2}]"#;
    assert_eq!(
        query.find_many(&who, &items, Some(two)).unwrap_err().code,
        ErrorCode::MalformedFilter
    );
}
