//! Layered configuration loading

use super::test_utils::with_env_vars;
use layout_mirror::config::{ConfigLoader, DEFAULT_STAGING_DIR};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_explicit_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("mirror.toml");
    fs::write(
        &config_file,
        r#"
[replay]
staging_dir = ".parking"

[logging]
level = "info"
format = "json"
"#,
    )
    .unwrap();

    let config = with_env_vars(&[], || ConfigLoader::load_from_file(&config_file)).unwrap();

    assert_eq!(config.replay.staging_dir, ".parking");
    assert!(!config.replay.prune_empty_dirs);
    assert!(config.scan.ignore_patterns.is_empty());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("mirror.toml");
    fs::write(
        &config_file,
        r#"
[replay]
prune_empty_dirs = false
"#,
    )
    .unwrap();

    let config = with_env_vars(
        &[
            ("LAYOUT_MIRROR__REPLAY__PRUNE_EMPTY_DIRS", "true"),
            ("LAYOUT_MIRROR__SCAN__IGNORE_PATTERNS", ".git,node_modules"),
        ],
        || ConfigLoader::load_from_file(&config_file),
    )
    .unwrap();

    assert!(config.replay.prune_empty_dirs);
    assert_eq!(
        config.scan.ignore_patterns,
        vec![".git".to_string(), "node_modules".to_string()]
    );
    assert_eq!(config.replay.staging_dir, DEFAULT_STAGING_DIR);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = with_env_vars(&[], || {
        ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml"))
    });
    assert!(result.is_err());
}

#[test]
fn test_invalid_value_type_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("mirror.toml");
    fs::write(
        &config_file,
        r#"
[replay]
prune_empty_dirs = "sometimes"
"#,
    )
    .unwrap();

    let result = with_env_vars(&[], || ConfigLoader::load_from_file(&config_file));
    assert!(result.is_err());
}
