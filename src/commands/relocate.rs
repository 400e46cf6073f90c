//! `appimage-venv relocate` command implementation.

use crate::error::{AppImageVenvError, Result};
use crate::host::HostEnv;
use crate::venv::{EnvContext, PyvenvCfg, Relocator, TemplateSource, PYVENV_CFG};
use std::path::{Path, PathBuf};

/// Arguments for the relocate command.
pub struct RelocateArgs {
    /// Existing environment directories
    pub dirs: Vec<PathBuf>,
    /// Prompt override (default: recorded prompt or directory name)
    pub prompt: Option<String>,
    /// Template source for activation scripts and pip.conf
    pub templates: TemplateSource,
    /// The AppImage the environments are relocated to
    pub host: HostEnv,
}

/// Execute the relocate command.
pub fn execute(args: RelocateArgs) -> Result<()> {
    let relocator = Relocator::new(args.templates.clone());

    for dir in &args.dirs {
        println!("Relocating venv at {}...", dir.display());
        let ctx = context_for(dir, &args)?;
        relocator.relocate(&ctx)?;
        println!("  Relocated to {}", ctx.executable().display());
    }

    Ok(())
}

/// Build the context of an existing environment from its pyvenv.cfg.
fn context_for(dir: &Path, args: &RelocateArgs) -> Result<EnvContext> {
    if !dir.is_dir() {
        return Err(AppImageVenvError::MissingDirectory(dir.to_path_buf()));
    }

    let cfg_path = dir.join(PYVENV_CFG);
    if !cfg_path.is_file() {
        return Err(AppImageVenvError::ConfigError(format!(
            "{} not found; not a virtual environment",
            cfg_path.display()
        )));
    }

    let cfg = PyvenvCfg::read(&cfg_path)?;
    let version = cfg.version().ok_or_else(|| {
        AppImageVenvError::InvalidVersion(format!("no version recorded in {}", cfg_path.display()))
    })?;
    let prompt = args.prompt.as_deref().or(cfg.prompt());

    EnvContext::build(dir, &args.host, version, prompt)
}
