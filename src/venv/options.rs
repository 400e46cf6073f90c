//! Environment creation options.

use crate::error::{AppImageVenvError, Result};

/// Packages refreshed by `--upgrade-deps`.
pub const CORE_VENV_DEPS: &[&str] = &["pip", "setuptools"];

/// Options passed through to environment creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOptions {
    /// Give the environment access to the system site-packages
    pub system_site_packages: bool,
    /// Delete the environment contents before creation
    pub clear: bool,
    /// Link the interpreter instead of copying it
    pub symlinks: bool,
    /// Upgrade an existing environment in place
    pub upgrade: bool,
    /// Bootstrap pip with ensurepip
    pub with_pip: bool,
    /// Prompt prefix for the activation scripts
    pub prompt: Option<String>,
    /// Upgrade pip and setuptools after bootstrapping
    pub upgrade_deps: bool,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            system_site_packages: false,
            clear: false,
            symlinks: cfg!(unix),
            upgrade: false,
            with_pip: true,
            prompt: None,
            upgrade_deps: false,
        }
    }
}

impl EnvOptions {
    /// Reject mutually exclusive options.
    pub fn validate(&self) -> Result<()> {
        if self.upgrade && self.clear {
            return Err(AppImageVenvError::ConflictingOptions(
                "you cannot supply --upgrade and --clear together.".to_string(),
            ));
        }
        Ok(())
    }
}
