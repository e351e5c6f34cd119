//! Unit tests for configuration module
//!
//! Tests configuration parsing, validation, serialization/deserialization,
//! and edge cases in configuration handling.

use super::*;
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_configuration_is_valid() {
    let config = ArborConfig::default();

    assert!(!config.general.debug);
    assert_eq!(config.general.log_level, "info");
    assert!(config.xwayland.enabled);
    assert!(config.xwayland.honor_client_geometry);
    assert!(config.validate().is_ok());
}

#[test]
fn test_configuration_serialization_roundtrip() -> Result<()> {
    let original_config = ArborConfig {
        general: GeneralConfig {
            debug: true,
            log_level: "debug".to_string(),
        },
        xwayland: XWaylandConfig {
            enabled: false,
            honor_client_geometry: false,
        },
    };

    // Serialize to TOML
    let toml_string = toml::to_string(&original_config)?;

    // Deserialize back
    let deserialized_config: ArborConfig = toml::from_str(&toml_string)?;

    assert_eq!(original_config, deserialized_config);

    Ok(())
}

#[test]
fn test_configuration_from_file() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("test_config.toml");

    // Write test configuration
    let test_config = r#"
[general]
debug = true
log_level = "warn"

[xwayland]
enabled = true
honor_client_geometry = false
"#;

    fs::write(&file_path, test_config)?;

    let config = ArborConfig::load(&file_path)?;

    assert!(config.general.debug);
    assert_eq!(config.general.log_level, "warn");
    assert!(config.xwayland.enabled);
    assert!(!config.xwayland.honor_client_geometry);

    Ok(())
}

#[test]
fn test_missing_file_yields_defaults() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("does_not_exist.toml");

    let config = ArborConfig::load(&file_path)?;
    assert_eq!(config, ArborConfig::default());

    Ok(())
}

#[test]
fn test_partial_file_fills_defaults() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("partial.toml");

    fs::write(&file_path, "[xwayland]\nenabled = false\n")?;

    let config = ArborConfig::load(&file_path)?;
    assert!(!config.xwayland.enabled);
    // Everything unspecified keeps its default.
    assert!(config.xwayland.honor_client_geometry);
    assert_eq!(config.general, GeneralConfig::default());

    Ok(())
}

#[test]
fn test_malformed_toml_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("broken.toml");

    fs::write(&file_path, "[general\ndebug = maybe")?;

    assert!(ArborConfig::load(&file_path).is_err());

    Ok(())
}

#[test]
fn test_invalid_log_level_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("bad_level.toml");

    fs::write(&file_path, "[general]\nlog_level = \"verbose\"\n")?;

    let result = ArborConfig::load(&file_path);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid log_level"));

    Ok(())
}

#[test]
fn test_save_and_reload() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("saved.toml");

    let mut config = ArborConfig::default();
    config.general.log_level = "trace".to_string();
    config.xwayland.honor_client_geometry = false;

    config.save(&file_path)?;
    let reloaded = ArborConfig::load(&file_path)?;

    assert_eq!(config, reloaded);

    Ok(())
}

#[test]
fn test_merge_partial_overrides_changed_sections() {
    let base = ArborConfig {
        general: GeneralConfig {
            debug: true,
            log_level: "debug".to_string(),
        },
        xwayland: XWaylandConfig::default(),
    };

    let partial = ArborConfig {
        general: GeneralConfig::default(),
        xwayland: XWaylandConfig {
            enabled: false,
            honor_client_geometry: true,
        },
    };

    let merged = base.merge_partial(partial);

    // The untouched section survives; the changed one is replaced.
    assert!(merged.general.debug);
    assert_eq!(merged.general.log_level, "debug");
    assert!(!merged.xwayland.enabled);
}
