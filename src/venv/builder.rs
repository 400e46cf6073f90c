//! Standard virtual environment creation.

use super::context::prompt_name;
use super::layout::VenvLayout;
use super::options::{EnvOptions, CORE_VENV_DEPS};
use super::pyvenv_cfg::write_atomic;
use crate::error::{AppImageVenvError, Result};
use crate::python::{PythonInfo, PythonProbe};
use std::fs;
use std::path::Path;

/// Builder for creating virtual environment directories.
pub struct VenvBuilder {
    options: EnvOptions,
}

impl VenvBuilder {
    /// Create a new venv builder.
    pub fn new(options: EnvOptions) -> Self {
        Self { options }
    }

    /// Get the creation options.
    pub fn options(&self) -> &EnvOptions {
        &self.options
    }

    /// Create a standard environment in `env_dir` for the probed interpreter.
    ///
    /// The interpreter entry links to the interpreter the probe ran, i.e. the
    /// path inside the currently mounted image. Relocation repoints it later.
    pub fn create(&self, env_dir: &Path, python: &PythonInfo) -> Result<VenvLayout> {
        self.options.validate()?;

        if env_dir.exists() && !env_dir.is_dir() {
            return Err(AppImageVenvError::ConfigError(format!(
                "{} exists and is not a directory",
                env_dir.display()
            )));
        }

        if self.options.clear && env_dir.is_dir() {
            tracing::info!(path = %env_dir.display(), "clearing environment directory");
            clear_directory(env_dir)?;
        }

        let layout = VenvLayout::new(env_dir, python.python_version());
        layout.create_dirs()?;

        self.create_pyvenv_cfg(&layout, python)?;
        self.setup_python(&layout, python)?;

        if self.options.with_pip {
            self.setup_pip(&layout)?;
        }
        if self.options.upgrade_deps {
            self.upgrade_dependencies(&layout)?;
        }

        Ok(layout)
    }

    /// Create the pyvenv.cfg file.
    fn create_pyvenv_cfg(&self, layout: &VenvLayout, python: &PythonInfo) -> Result<()> {
        // The "home" directory is the directory containing the Python executable
        let base = Path::new(python.base_interpreter());
        let home = base
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| python.prefix.clone());

        let mut cfg_content = format!(
            "home = {home}\n\
             include-system-site-packages = {system_site}\n\
             version = {version}\n",
            home = home,
            system_site = self.options.system_site_packages,
            version = python.full_version(),
        );
        if let Some(ref prompt) = self.options.prompt {
            let name = prompt_name(Some(prompt), &layout.env_dir)?;
            cfg_content.push_str(&format!("prompt = '{}'\n", name));
        }

        write_atomic(&layout.cfg_path, cfg_content.as_bytes())?;
        tracing::debug!(path = %layout.cfg_path.display(), "wrote pyvenv.cfg");
        Ok(())
    }

    /// Create bin/pythonX.Y and its aliases.
    fn setup_python(&self, layout: &VenvLayout, python: &PythonInfo) -> Result<()> {
        let base = Path::new(python.base_interpreter());
        let exists = fs::symlink_metadata(&layout.env_exe).is_ok();

        if exists && self.options.upgrade {
            fs::remove_file(&layout.env_exe)?;
        }
        if !exists || self.options.upgrade {
            if self.options.symlinks {
                symlink(base, &layout.env_exe)?;
            } else {
                fs::copy(base, &layout.env_exe)?;
            }
        }

        let exe_name = layout
            .env_exe
            .file_name()
            .map(Path::new)
            .unwrap_or_else(|| Path::new("python"));
        for alias in layout.aliases() {
            if alias == layout.env_exe {
                continue;
            }
            if fs::symlink_metadata(&alias).is_ok() {
                fs::remove_file(&alias)?;
            }
            symlink(exe_name, &alias)?;
        }

        Ok(())
    }

    /// Bootstrap pip into the environment with ensurepip.
    fn setup_pip(&self, layout: &VenvLayout) -> Result<()> {
        println!("  Bootstrapping pip...");
        PythonProbe::new(&layout.env_exe).run_module([
            "-Im",
            "ensurepip",
            "--upgrade",
            "--default-pip",
        ])?;
        Ok(())
    }

    /// Upgrade the core packages to the latest release.
    fn upgrade_dependencies(&self, layout: &VenvLayout) -> Result<()> {
        println!("  Upgrading {}...", CORE_VENV_DEPS.join(", "));
        let mut args = vec!["-m", "pip", "install", "--upgrade"];
        args.extend_from_slice(CORE_VENV_DEPS);
        PythonProbe::new(&layout.env_exe).run_module(args)?;
        Ok(())
    }
}

/// Remove everything inside `dir`, keeping the directory itself.
fn clear_directory(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let meta = fs::symlink_metadata(&path)?;
        if meta.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) fn symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn symlink(_target: &Path, link: &Path) -> Result<()> {
    Err(AppImageVenvError::Unsupported(format!(
        "cannot create symlink {}",
        link.display()
    )))
}
