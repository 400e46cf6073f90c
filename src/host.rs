//! Host precondition: the process must be launched by an AppImage.

use crate::error::{AppImageVenvError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable the AppImage runtime sets to the image file path.
pub const APPIMAGE_VAR: &str = "APPIMAGE";

/// The AppImage the current process runs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    executable: PathBuf,
}

impl HostEnv {
    /// Read the host from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_var(std::env::var_os(APPIMAGE_VAR))
    }

    /// Build a host from an explicit interpreter path.
    pub fn from_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn from_var(appimage: Option<OsString>) -> Result<Self> {
        match appimage {
            Some(value) if !value.is_empty() => Ok(Self {
                executable: PathBuf::from(value),
            }),
            _ => Err(AppImageVenvError::NotInAppImage(APPIMAGE_VAR)),
        }
    }

    /// Path of the portable interpreter (the AppImage file).
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// Diagnostic lines printed when the host precondition fails.
pub fn not_in_appimage_message() -> [String; 2] {
    [
        "Error: This wrapper is meant to be ran by an AppImage.".to_string(),
        format!("Error: Environment variable '{}' not found.", APPIMAGE_VAR),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_appimage_is_error() {
        let err = HostEnv::from_var(None).unwrap_err();
        assert!(matches!(err, AppImageVenvError::NotInAppImage("APPIMAGE")));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_empty_appimage_is_error() {
        let result = HostEnv::from_var(Some(OsString::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_appimage_path() {
        let host = HostEnv::from_var(Some("/home/user/Python.AppImage".into())).unwrap();
        assert_eq!(host.executable(), Path::new("/home/user/Python.AppImage"));
    }

    #[test]
    fn test_message_lines() {
        let lines = not_in_appimage_message();
        assert!(lines[0].contains("AppImage"));
        assert_eq!(lines[1], "Error: Environment variable 'APPIMAGE' not found.");
    }
}
