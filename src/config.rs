//! Configuration file support for bedshift.
//!
//! This module loads `.bedshift.toml` files, which provide defaults for
//! the seed, the delimiter and the add/shift distributions.
//!
//! # Example Configuration
//!
//! ```toml
//! [defaults]
//! seed = 42
//! delimiter = "\t"
//! add-mean = 320.0
//! add-stdev = 30.0
//! shift-mean = 0.0
//! shift-stdev = 150.0
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.bedshift.toml` in current directory
//! 2. `~/.config/bedshift/config.toml`
//!
//! CLI flags take precedence over config file settings.

use crate::bed::DEFAULT_DELIMITER;
use crate::cli::parse_delimiter;
use crate::error::BedshiftError;
use crate::pipeline::{DEFAULT_ADD_MEAN, DEFAULT_ADD_STDEV, DEFAULT_SHIFT_MEAN, DEFAULT_SHIFT_STDEV};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed configuration from a .bedshift.toml file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedshiftConfig {
    /// Default values for CLI options.
    #[serde(default)]
    pub defaults: Defaults,
}

/// Optional defaults, shared by the config file and the CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Defaults {
    pub seed: Option<u64>,
    pub delimiter: Option<String>,
    pub add_mean: Option<f64>,
    pub add_stdev: Option<f64>,
    pub shift_mean: Option<f64>,
    pub shift_stdev: Option<f64>,
}

/// Settings after merging CLI, config file and built-in defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub seed: Option<u64>,
    pub delimiter: char,
    pub add_mean: f64,
    pub add_stdev: f64,
    pub shift_mean: f64,
    pub shift_stdev: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            delimiter: DEFAULT_DELIMITER,
            add_mean: DEFAULT_ADD_MEAN,
            add_stdev: DEFAULT_ADD_STDEV,
            shift_mean: DEFAULT_SHIFT_MEAN,
            shift_stdev: DEFAULT_SHIFT_STDEV,
        }
    }
}

impl BedshiftConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.bedshift.toml` in current directory
    /// 2. `~/.config/bedshift/config.toml`
    ///
    /// A file that exists but fails to parse is skipped with a warning.
    pub fn load() -> Option<Self> {
        let candidates = std::iter::once(PathBuf::from(".bedshift.toml")).chain(
            dirs_home().map(|home| home.join(".config").join("bedshift").join("config.toml")),
        );

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    return Some(config);
                }
                Err(e) => tracing::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, BedshiftError> {
        let content = fs::read_to_string(path).map_err(|e| BedshiftError::Config {
            msg: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, BedshiftError> {
        Ok(toml::from_str(content)?)
    }

    /// Merge this config with CLI arguments.
    /// CLI arguments take precedence.
    pub fn merge_with_cli(&self, cli: &Defaults) -> Result<Settings, BedshiftError> {
        let file = &self.defaults;
        let builtin = Settings::default();

        let delimiter = match cli.delimiter.as_deref().or(file.delimiter.as_deref()) {
            Some(value) => parse_delimiter(value)?,
            None => builtin.delimiter,
        };

        Ok(Settings {
            seed: cli.seed.or(file.seed),
            delimiter,
            add_mean: cli.add_mean.or(file.add_mean).unwrap_or(builtin.add_mean),
            add_stdev: cli.add_stdev.or(file.add_stdev).unwrap_or(builtin.add_stdev),
            shift_mean: cli.shift_mean.or(file.shift_mean).unwrap_or(builtin.shift_mean),
            shift_stdev: cli
                .shift_stdev
                .or(file.shift_stdev)
                .unwrap_or(builtin.shift_stdev),
        })
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
