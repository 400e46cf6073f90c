//! Configuration file handling for appimage-venv.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The configuration file name.
pub const CONFIG_FILE_NAME: &str = "appimage-venv.toml";

/// Configuration from appimage-venv.toml.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interpreter used to create environments (default: $APPIMAGE)
    pub python: Option<PathBuf>,

    /// Directory with `scripts/` and `configs/` template overrides
    pub templates_dir: Option<PathBuf>,

    /// Default prompt prefix
    pub prompt: Option<String>,

    /// Skip bootstrapping pip by default
    #[serde(default)]
    pub without_pip: bool,

    /// Copy the interpreter instead of symlinking it
    #[serde(default)]
    pub copies: bool,

    /// Give new environments access to the system site-packages
    #[serde(default)]
    pub system_site_packages: bool,
}

impl Config {
    /// Load configuration from appimage-venv.toml in the given directory or its parents.
    ///
    /// Returns `Ok(None)` if no configuration file is found.
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir
            .canonicalize()
            .unwrap_or_else(|_| start_dir.to_path_buf());

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load_file(&config_path).map(Some);
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Load a specific configuration file.
    ///
    /// A relative `templates_dir` is taken relative to the file's directory.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");

        config.templates_dir = config.templates_dir.take().map(|dir| match path.parent() {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir,
        });
        Ok(config)
    }

    /// Path of the per-user configuration file.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("appimage-venv").join("config.toml"))
    }

    /// Load configuration from the current directory, falling back to the
    /// per-user configuration file.
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        if let Some(config) = Self::load(&cwd)? {
            return Ok(Some(config));
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::load_file(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}
