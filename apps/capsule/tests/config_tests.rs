//! Integration tests for configuration loading and CLI overrides.

use capsule::cli::{Cli, Settings};
use capsule::config::{AppConfig, DEFAULT_CONTENT_DIR, LogFormat};
use capsule_core::{CapsuleError, DuplicatePolicy};
use clap::Parser;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE LOADING
// =============================================================================

#[test]
fn test_load_relative_content_dir_from_config_location() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("capsule.toml");
    std::fs::write(&path, "content_dir = \"records\"\nstrict = true\n").expect("write");

    let config = AppConfig::from_path(&path).expect("load");
    assert_eq!(config.content_dir, dir.path().join("records"));
    assert!(config.strict);
    assert_eq!(config.log.format, LogFormat::Text);
}

#[test]
fn test_load_absolute_content_dir_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("capsule.toml");
    let absolute = dir.path().join("elsewhere");
    std::fs::write(
        &path,
        format!("content_dir = {:?}\n", absolute.to_string_lossy()),
    )
    .expect("write");

    let config = AppConfig::from_path(&path).expect("load");
    assert_eq!(config.content_dir, absolute);
}

#[test]
fn test_explicit_missing_config_is_error() {
    let result = AppConfig::load(Some(Path::new("/definitely/not/capsule.toml")));
    assert!(matches!(result, Err(CapsuleError::ConfigError(_))));
}

#[test]
fn test_invalid_config_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "strict = \"yes please\"").expect("write");

    let err = AppConfig::from_path(&path).expect_err("invalid");
    assert!(err.to_string().contains("broken.toml"));
}

// =============================================================================
// CLI OVERRIDES
// =============================================================================

#[test]
fn test_defaults_without_flags() {
    let cli = Cli::try_parse_from(["capsule"]).expect("parse");
    let settings = Settings::resolve(&cli, &AppConfig::default());

    assert_eq!(settings.content_dir, PathBuf::from(DEFAULT_CONTENT_DIR));
    assert_eq!(settings.policy, DuplicatePolicy::Overwrite);
    assert!(!settings.json_mode);
    assert!(cli.command.is_none());
}

#[test]
fn test_flags_override_file() {
    let config = AppConfig::from_toml_str("content_dir = \"from-file\"").expect("parse");
    let cli = Cli::try_parse_from(["capsule", "--strict", "-C", "from-flag", "routes", "--json-mode"])
        .expect("parse");
    let settings = Settings::resolve(&cli, &config);

    assert_eq!(settings.content_dir, PathBuf::from("from-flag"));
    assert_eq!(settings.policy, DuplicatePolicy::Reject);
    assert!(settings.json_mode);
}

#[test]
fn test_file_strict_survives_without_flag() {
    let config = AppConfig::from_toml_str("strict = true").expect("parse");
    let cli = Cli::try_parse_from(["capsule", "check"]).expect("parse");
    assert_eq!(Settings::resolve(&cli, &config).policy, DuplicatePolicy::Reject);
}

#[test]
fn test_unknown_kind_rejected_by_parser() {
    assert!(Cli::try_parse_from(["capsule", "list", "--kind", "event"]).is_err());
    assert!(Cli::try_parse_from(["capsule", "list", "--kind", "place"]).is_ok());
}
