//! Configuration management for Arbor
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It covers general compositor settings and the X11
//! compatibility layer's policy knobs.

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration struct containing all Arbor settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ArborConfig {
    /// General compositor settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// XWayland configuration
    #[serde(default)]
    pub xwayland: XWaylandConfig,
}

/// General compositor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,

    /// Log level filter ("trace", "debug", "info", "warn", "error")
    pub log_level: String,
}

/// XWayland configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct XWaylandConfig {
    /// Enable XWayland support. When disabled, surface binds are refused.
    pub enabled: bool,

    /// Geometry authority for legacy windows. When true (the default), a
    /// surface's self-reported size wins on commit and its configure
    /// requests are honored verbatim. When false, the compositor's own
    /// size requests win and configure requests are ignored.
    pub honor_client_geometry: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

impl Default for XWaylandConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            honor_client_geometry: true,
        }
    }
}

impl ArborConfig {
    /// Load configuration from a TOML file. A missing file yields the
    /// defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Expand ~ to home directory
        let expanded_path = if path.to_string_lossy().starts_with('~') {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Path::new(&home).join(path.strip_prefix("~").unwrap_or(path))
        } else {
            path.to_path_buf()
        };

        if !expanded_path.exists() {
            info!(
                "📋 No config file at {}, using defaults",
                expanded_path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: ArborConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        info!("📋 Loaded configuration from {}", expanded_path.display());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level '{}': must be one of {:?}",
                self.general.log_level,
                valid_levels
            );
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Non-default values from the partial config will override this config
    pub fn merge_partial(mut self, partial: ArborConfig) -> Self {
        let default_config = ArborConfig::default();

        let general_changed = partial.general != default_config.general;
        let xwayland_changed = partial.xwayland != default_config.xwayland;

        if general_changed {
            self.general = partial.general;
        }
        if xwayland_changed {
            self.xwayland = partial.xwayland;
        }

        self
    }
}

#[cfg(test)]
mod tests;
