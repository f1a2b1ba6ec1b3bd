//! Configuration file support for Berth.
//!
//! Berth reads two configuration files:
//! - Global: `~/.berth/config.toml` - User-wide defaults
//! - Project: `.berth/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Platform;

/// Berth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,

    /// Terminal output settings
    pub term: TermConfig,
}

/// Settings that shape the descriptor graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenerateConfig {
    /// Platform to resolve for instead of the host (windows, macos, linux, other)
    pub platform: Option<String>,

    /// Default for manifests whose [lib] does not set `platform-libs`
    pub platform_libs: Option<bool>,
}

/// Terminal output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Colored diagnostics
    pub color: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.generate.platform.is_some() {
            self.generate.platform = other.generate.platform;
        }
        if other.generate.platform_libs.is_some() {
            self.generate.platform_libs = other.generate.platform_libs;
        }
        if other.term.color.is_some() {
            self.term.color = other.term.color;
        }
    }

    /// Parse the configured platform override.
    ///
    /// An unrecognized value is logged and ignored.
    pub fn platform(&self) -> Option<Platform> {
        let value = self.generate.platform.as_deref()?;
        match value.parse() {
            Ok(platform) => Some(platform),
            Err(e) => {
                tracing::warn!("ignoring configured platform: {}", e);
                None
            }
        }
    }

    /// Whether libraries get the platform library table unless they opt out.
    pub fn platform_libs(&self) -> bool {
        self.generate.platform_libs.unwrap_or(false)
    }
}

/// Get the global berth config directory (~/.berth).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".berth"))
}

/// Get the global config path (~/.berth/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.berth/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".berth").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/config.toml)
/// 2. Global config (~/.berth/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}
