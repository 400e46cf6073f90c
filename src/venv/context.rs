//! Paths derived for relocating one environment.

use super::layout::VenvLayout;
use crate::error::{AppImageVenvError, Result};
use crate::host::HostEnv;
use crate::python::{is_executable, PythonVersion};
use std::path::{Path, PathBuf};

/// Everything the relocation steps need to know about one environment.
///
/// Built once per environment by [`EnvContext::build`] and then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvContext {
    env_dir: PathBuf,
    executable: PathBuf,
    python_dir: PathBuf,
    exe_name: String,
    bin_path: PathBuf,
    bin_full_path: PathBuf,
    env_exe: PathBuf,
    cfg_path: PathBuf,
    lib_path: PathBuf,
    version: PythonVersion,
    prompt: String,
}

impl EnvContext {
    /// Derive the context for `env_dir`.
    ///
    /// Fails if the environment's standard directories are missing or the
    /// host executable is unusable.
    pub fn build(
        env_dir: &Path,
        host: &HostEnv,
        version: PythonVersion,
        prompt: Option<&str>,
    ) -> Result<Self> {
        let env_dir = absolute(env_dir)?;
        let layout = VenvLayout::resolve(&env_dir, version)?;

        let executable = absolute(host.executable())?;
        if !is_executable(&executable) {
            return Err(AppImageVenvError::InvalidExecutable(format!(
                "{} is not an executable file",
                executable.display()
            )));
        }
        if executable.starts_with(&env_dir) {
            return Err(AppImageVenvError::InvalidExecutable(format!(
                "{} is inside the environment {}",
                executable.display(),
                env_dir.display()
            )));
        }

        let python_dir = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let exe_name = executable
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let name = prompt_name(prompt, &env_dir)?;
        let prompt = if name.is_empty() {
            String::new()
        } else {
            format!("({}) ", name)
        };

        Ok(Self {
            bin_path: PathBuf::from("bin"),
            bin_full_path: layout.bin_dir,
            env_exe: layout.env_exe,
            cfg_path: layout.cfg_path,
            lib_path: layout.site_packages,
            env_dir,
            executable,
            python_dir,
            exe_name,
            version,
            prompt,
        })
    }

    /// Absolute environment root.
    pub fn env_dir(&self) -> &Path {
        &self.env_dir
    }

    /// Portable interpreter every reference is pointed at.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn python_dir(&self) -> &Path {
        &self.python_dir
    }

    pub fn exe_name(&self) -> &str {
        &self.exe_name
    }

    /// Script directory relative to the environment root.
    pub fn bin_path(&self) -> &Path {
        &self.bin_path
    }

    pub fn bin_full_path(&self) -> &Path {
        &self.bin_full_path
    }

    /// The environment's interpreter entry, e.g. `bin/python3.10`.
    pub fn env_exe(&self) -> &Path {
        &self.env_exe
    }

    pub fn cfg_path(&self) -> &Path {
        &self.cfg_path
    }

    /// The environment's site-packages directory.
    pub fn lib_path(&self) -> &Path {
        &self.lib_path
    }

    pub fn version(&self) -> PythonVersion {
        self.version
    }

    /// Shell prompt prefix, e.g. `(envA) `, or empty.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Resolve the prompt label: explicit value, `.` for the current
/// directory's name, or the environment directory's name.
pub fn prompt_name(prompt: Option<&str>, env_dir: &Path) -> Result<String> {
    match prompt {
        Some(".") => Ok(prompt_name_in(prompt, env_dir, &std::env::current_dir()?)),
        _ => Ok(prompt_name_in(prompt, env_dir, Path::new(""))),
    }
}

fn prompt_name_in(prompt: Option<&str>, env_dir: &Path, cwd: &Path) -> String {
    let dir_name = |dir: &Path| {
        dir.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    };
    match prompt {
        Some(".") => dir_name(cwd),
        Some(p) => p.to_string(),
        None => dir_name(env_dir),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
