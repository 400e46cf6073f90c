//! appimage-venv - virtual environments for an AppImage-bundled Python
//!
//! Creates standard virtual environments and relocates them so that their
//! interpreter link, `pyvenv.cfg`, activation scripts and `pip.conf` refer
//! to the AppImage file rather than its temporary mount point.

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod python;
pub mod venv;

pub use config::Config;
pub use error::{AppImageVenvError, Result};
