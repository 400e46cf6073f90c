//! Virtual environment directory layout.

use crate::error::{AppImageVenvError, Result};
use crate::python::PythonVersion;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the environment configuration file.
pub const PYVENV_CFG: &str = "pyvenv.cfg";

/// Paths of a conventional unix virtual environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    pub env_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub include_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub site_packages: PathBuf,
    /// The versioned interpreter entry, e.g. `bin/python3.10`
    pub env_exe: PathBuf,
    pub cfg_path: PathBuf,
}

impl VenvLayout {
    /// Compute the layout without touching the filesystem.
    pub fn new(env_dir: &Path, version: PythonVersion) -> Self {
        let env_dir = env_dir.to_path_buf();
        let bin_dir = env_dir.join("bin");
        let lib_dir = env_dir.join("lib").join(version.exe_name());

        Self {
            include_dir: env_dir.join("include"),
            site_packages: lib_dir.join("site-packages"),
            env_exe: bin_dir.join(version.exe_name()),
            cfg_path: env_dir.join(PYVENV_CFG),
            bin_dir,
            lib_dir,
            env_dir,
        }
    }

    /// Compute the layout and verify the standard directories exist.
    pub fn resolve(env_dir: &Path, version: PythonVersion) -> Result<Self> {
        let layout = Self::new(env_dir, version);
        for dir in [&layout.env_dir, &layout.bin_dir, &layout.site_packages] {
            if !dir.is_dir() {
                return Err(AppImageVenvError::MissingDirectory(dir.clone()));
            }
        }
        Ok(layout)
    }

    /// Create the environment directories.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [&self.bin_dir, &self.include_dir, &self.site_packages] {
            fs::create_dir_all(dir)?;
        }

        // Mirrors CPython: lib64 -> lib on 64-bit posix
        #[cfg(all(unix, target_pointer_width = "64"))]
        {
            let lib64 = self.env_dir.join("lib64");
            if fs::symlink_metadata(&lib64).is_err() {
                std::os::unix::fs::symlink("lib", &lib64)?;
            }
        }

        Ok(())
    }

    /// Unversioned interpreter aliases that point at `env_exe`.
    pub fn aliases(&self) -> [PathBuf; 2] {
        [self.bin_dir.join("python"), self.bin_dir.join("python3")]
    }
}
