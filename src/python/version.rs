//! Python `major.minor` version.

use crate::error::AppImageVenvError;
use std::fmt;
use std::str::FromStr;

/// The interpreter version an environment is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Name of the versioned interpreter entry, e.g. `python3.10`.
    pub fn exe_name(&self) -> String {
        format!("python{}", self)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = AppImageVenvError;

    /// Accepts `3.10`, `3.10.12` and suffixed forms like `3.13.0rc1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppImageVenvError::InvalidVersion(s.to_string());
        let mut parts = s.trim().split('.');

        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.split(|c: char| !c.is_ascii_digit()).next())
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;

        Ok(Self { major, minor })
    }
}
