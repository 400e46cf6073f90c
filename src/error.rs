//! Error types for appimage-venv.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for appimage-venv operations.
pub type Result<T> = std::result::Result<T, AppImageVenvError>;

/// Errors that can occur while creating or relocating an environment.
#[derive(Error, Debug)]
pub enum AppImageVenvError {
    #[error("This wrapper is meant to be ran by an AppImage. Environment variable '{0}' not found.")]
    NotInAppImage(&'static str),

    #[error("Invalid interpreter executable: {0}")]
    InvalidExecutable(String),

    #[error("Python command failed: {0}")]
    PythonCommandFailed(String),

    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    #[error("Missing environment directory: {0}")]
    MissingDirectory(PathBuf),

    #[error("Interpreter link not found: {0}")]
    MissingInterpreterLink(PathBuf),

    #[error("No 'home' setting in {0}")]
    MissingHomeKey(PathBuf),

    #[error("Template not found: {0}")]
    MissingTemplate(PathBuf),

    #[error("Invalid Python version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Interpreter lookup failed: {0}")]
    Which(#[from] which::Error),
}

impl AppImageVenvError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotInAppImage(_) => 2,
            _ => 1,
        }
    }
}
