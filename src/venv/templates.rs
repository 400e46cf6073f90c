//! Activation script and pip.conf templates.

use crate::error::{AppImageVenvError, Result};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// Shell activation scripts written into the environment's `bin/`.
pub const ACTIVATION_SCRIPTS: &[&str] = &["activate", "activate.csh", "activate.fish"];

/// Package manager configuration written into the environment root.
pub const PIP_CONF: &str = "pip.conf";

/// Activation script for a shell the image does not support.
pub const WINDOWS_ACTIVATE: &str = "Activate.ps1";

// Embedded template files
const ACTIVATE_TEMPLATE: &str = include_str!("scripts/activate");
const ACTIVATE_CSH_TEMPLATE: &str = include_str!("scripts/activate.csh");
const ACTIVATE_FISH_TEMPLATE: &str = include_str!("scripts/activate.fish");
const PIP_CONF_TEMPLATE: &str = include_str!("configs/pip.conf");

/// Where template text comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    #[default]
    Embedded,
    /// A directory holding `scripts/<name>` and `configs/pip.conf`
    Directory(PathBuf),
}

impl TemplateSource {
    /// Load the text of an activation script template.
    pub fn script(&self, name: &str) -> Result<Cow<'static, str>> {
        match self {
            Self::Embedded => embedded_script(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| AppImageVenvError::MissingTemplate(PathBuf::from("scripts").join(name))),
            Self::Directory(dir) => read_template(dir.join("scripts").join(name)),
        }
    }

    /// Load the text of the pip.conf template.
    pub fn pip_conf(&self) -> Result<Cow<'static, str>> {
        match self {
            Self::Embedded => Ok(Cow::Borrowed(PIP_CONF_TEMPLATE)),
            Self::Directory(dir) => read_template(dir.join("configs").join(PIP_CONF)),
        }
    }
}

fn embedded_script(name: &str) -> Option<&'static str> {
    match name {
        "activate" => Some(ACTIVATE_TEMPLATE),
        "activate.csh" => Some(ACTIVATE_CSH_TEMPLATE),
        "activate.fish" => Some(ACTIVATE_FISH_TEMPLATE),
        _ => None,
    }
}

fn read_template(path: PathBuf) -> Result<Cow<'static, str>> {
    if !path.is_file() {
        return Err(AppImageVenvError::MissingTemplate(path));
    }
    Ok(Cow::Owned(fs::read_to_string(&path)?))
}
