//! Global context for Berth operations.
//!
//! Provides centralized access to configuration, paths and the platform the
//! run resolves for.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::find_manifest as ws_find_manifest;
use crate::core::{ManifestError, Platform};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Merged global + project configuration
    config: Config,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    ///
    /// The project config is read from `<cwd>/.berth/config.toml`.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let global = config::global_config_path();
        let config = config::load_config(global.as_deref(), &config::project_config_path(&cwd));
        Self::with_config(cwd, config)
    }

    /// Create a GlobalContext with an explicit configuration.
    pub fn with_config(cwd: PathBuf, config: Config) -> Self {
        let color = config.term.color.unwrap_or(true);
        GlobalContext {
            cwd,
            config,
            verbose: false,
            color,
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// The platform this run resolves for.
    ///
    /// An explicit override beats the configured platform, which beats
    /// host detection.
    pub fn platform(&self, explicit: Option<Platform>) -> Platform {
        let platform = explicit
            .or_else(|| self.config.platform())
            .unwrap_or_else(Platform::host);
        tracing::debug!("resolving for platform `{}`", platform);
        platform
    }

    /// Find Berth.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        let mut current = self.cwd.clone();
        loop {
            if let Some(path) = ws_find_manifest(&current) {
                return Ok(path);
            }
            if !current.pop() {
                return Err(ManifestError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_manifest_walks_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Berth.toml"), "[package]\nname = \"app\"\n").unwrap();
        let nested = tmp.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_config(nested, Config::default());
        let found = ctx.find_manifest().unwrap();
        assert_eq!(found, tmp.path().join("Berth.toml"));
    }

    #[test]
    fn test_find_manifest_not_found() {
        // Relative, so the walk ends at the crate root, which has no Berth.toml.
        let cwd = PathBuf::from("no-such-dir").join("nested");
        let ctx = GlobalContext::with_config(cwd.clone(), Config::default());

        match ctx.find_manifest() {
            Err(ManifestError::NotFound { dir }) => assert_eq!(dir, cwd),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_platform_precedence() {
        let mut config = Config::default();
        config.generate.platform = Some("windows".to_string());
        let ctx = GlobalContext::with_config(PathBuf::from("."), config);

        assert_eq!(ctx.platform(Some(Platform::Linux)), Platform::Linux);
        assert_eq!(ctx.platform(None), Platform::Windows);

        let ctx = GlobalContext::with_config(PathBuf::from("."), Config::default());
        assert_eq!(ctx.platform(None), Platform::host());
    }

    #[test]
    fn test_color_from_config() {
        let mut config = Config::default();
        config.term.color = Some(false);
        let ctx = GlobalContext::with_config(PathBuf::from("."), config);
        assert!(!ctx.color());
    }
}
