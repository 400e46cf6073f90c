//! Repoint an environment at the portable interpreter.
//!
//! Relocation runs four stages in a fixed order:
//!
//! 1. relink the interpreter entry in `bin/` to the AppImage,
//! 2. rewrite the `home` line of `pyvenv.cfg`,
//! 3. render the shell activation scripts,
//! 4. render `pip.conf` in the environment root.
//!
//! The first failing stage stops the pipeline. Stages already applied are not
//! undone; an environment whose relocation failed should be recreated.

use super::builder::symlink;
use super::context::EnvContext;
use super::pyvenv_cfg::{write_atomic, PyvenvCfg};
use super::templates::{TemplateSource, ACTIVATION_SCRIPTS, PIP_CONF, WINDOWS_ACTIVATE};
use crate::error::{AppImageVenvError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Links followed from one interpreter entry before giving up.
const MAX_SIBLING_HOPS: usize = 8;

/// Placeholder for the environment root.
pub const VENV_DIR_TOKEN: &str = "__VENV_DIR__";
/// Placeholder for the site-packages directory.
pub const VENV_LIB_DIR_TOKEN: &str = "__VENV_LIB_DIR__";
/// Placeholder for the absolute script directory.
pub const VENV_BIN_NAME_TOKEN: &str = "__VENV_BIN_NAME__";
/// Placeholder for the prompt prefix.
pub const VENV_PROMPT_TOKEN: &str = "__VENV_PROMPT__";

/// Named relocation stage, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RelinkInterpreter,
    RewriteConfig,
    RewriteActivationScripts,
    WritePipConf,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 4] = [
        Stage::RelinkInterpreter,
        Stage::RewriteConfig,
        Stage::RewriteActivationScripts,
        Stage::WritePipConf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RelinkInterpreter => "relink interpreter",
            Self::RewriteConfig => "rewrite pyvenv.cfg",
            Self::RewriteActivationScripts => "rewrite activation scripts",
            Self::WritePipConf => "write pip.conf",
        }
    }
}

/// Runs the relocation stages against one environment at a time.
#[derive(Debug, Clone, Default)]
pub struct Relocator {
    templates: TemplateSource,
}

impl Relocator {
    pub fn new(templates: TemplateSource) -> Self {
        Self { templates }
    }

    /// Relocate the environment described by `ctx`.
    pub fn relocate(&self, ctx: &EnvContext) -> Result<()> {
        for stage in Stage::ALL {
            tracing::info!(env = %ctx.env_dir().display(), "{}", stage.name());
            self.run_stage(stage, ctx).inspect_err(|e| {
                tracing::error!(stage = stage.name(), "relocation stopped: {}", e);
            })?;
        }
        Ok(())
    }

    fn run_stage(&self, stage: Stage, ctx: &EnvContext) -> Result<()> {
        match stage {
            Stage::RelinkInterpreter => relink_interpreter(ctx),
            Stage::RewriteConfig => rewrite_config(ctx),
            Stage::RewriteActivationScripts => rewrite_activation_scripts(ctx, &self.templates),
            Stage::WritePipConf => write_pip_conf(ctx, &self.templates),
        }
    }
}

/// Replace the interpreter entry with a symlink to the portable interpreter.
///
/// Usually one of `python`, `python3` and `pythonX.Y` holds the real link and the
/// others are sibling links to it. Which one depends on the name of the
/// interpreter the environment was created from, so every entry is followed
/// through its siblings and the entry it ends on is relinked.
pub fn relink_interpreter(ctx: &EnvContext) -> Result<()> {
    let entries = interpreter_entries(ctx);
    if entries.is_empty() {
        return Err(AppImageVenvError::MissingInterpreterLink(
            ctx.env_exe().to_path_buf(),
        ));
    }

    for link in &entries {
        fs::remove_file(link)?;
        symlink(ctx.executable(), link)?;
        tracing::debug!(link = %link.display(), target = %ctx.executable().display(), "relinked");
    }
    Ok(())
}

/// Entries of `bin/` that do not just point at a sibling entry.
fn interpreter_entries(ctx: &EnvContext) -> Vec<PathBuf> {
    let bin = ctx.bin_full_path();
    let names = [ctx.env_exe().to_path_buf(), bin.join("python3"), bin.join("python")];

    let mut entries: Vec<PathBuf> = Vec::new();
    for start in names {
        let entry = follow_siblings(bin, start);
        if fs::symlink_metadata(&entry).is_ok() && !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    entries
}

fn follow_siblings(bin: &Path, mut path: PathBuf) -> PathBuf {
    // Bounded so a link cycle cannot spin forever
    for _ in 0..MAX_SIBLING_HOPS {
        match fs::read_link(&path) {
            Ok(target) if is_sibling(&target) => path = bin.join(target),
            _ => break,
        }
    }
    path
}

fn is_sibling(target: &Path) -> bool {
    let mut components = target.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Point the `home` setting of `pyvenv.cfg` at the portable interpreter.
pub fn rewrite_config(ctx: &EnvContext) -> Result<()> {
    let path = ctx.cfg_path();
    let mut cfg = PyvenvCfg::read(path)?;
    if !cfg.set_home(&ctx.executable().to_string_lossy()) {
        return Err(AppImageVenvError::MissingHomeKey(path.to_path_buf()));
    }
    cfg.write_atomic(path)
}

/// Render the activation scripts into `bin/` and drop `Activate.ps1`.
pub fn rewrite_activation_scripts(ctx: &EnvContext, templates: &TemplateSource) -> Result<()> {
    for name in ACTIVATION_SCRIPTS {
        let template = templates.script(name)?;
        let destination = ctx.bin_full_path().join(name);
        render_to(&template, ctx, &destination)?;
    }

    let windows_activate = ctx.bin_full_path().join(WINDOWS_ACTIVATE);
    match fs::remove_file(&windows_activate) {
        Ok(()) => tracing::debug!(path = %windows_activate.display(), "removed"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %windows_activate.display(),
            "could not remove unused activation script: {}",
            e
        ),
    }
    Ok(())
}

/// Render `pip.conf` into the environment root.
pub fn write_pip_conf(ctx: &EnvContext, templates: &TemplateSource) -> Result<()> {
    let template = templates.pip_conf()?;
    render_to(&template, ctx, &ctx.env_dir().join(PIP_CONF))
}

fn render_to(template: &str, ctx: &EnvContext, destination: &Path) -> Result<()> {
    let rendered: String = template
        .split_inclusive('\n')
        .map(|line| substitute(line, ctx))
        .collect();
    write_atomic(destination, rendered.as_bytes())?;
    tracing::debug!(path = %destination.display(), "wrote");
    Ok(())
}

/// Replace every placeholder in `line` with its context value.
///
/// The line is scanned once; substituted text is never rescanned, so the
/// outcome does not depend on the order the placeholders appear in.
pub fn substitute(line: &str, ctx: &EnvContext) -> String {
    let env_dir = ctx.env_dir().to_string_lossy();
    let lib_path = ctx.lib_path().to_string_lossy();
    let bin_full_path = ctx.bin_full_path().to_string_lossy();
    let replacements: [(&str, &str); 4] = [
        (VENV_DIR_TOKEN, &*env_dir),
        (VENV_LIB_DIR_TOKEN, &*lib_path),
        (VENV_BIN_NAME_TOKEN, &*bin_full_path),
        (VENV_PROMPT_TOKEN, ctx.prompt()),
    ];
    replace_tokens(line, &replacements)
}

fn replace_tokens(line: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(pos) = rest.find("__") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match replacements.iter().find(|(token, _)| tail.starts_with(token)) {
            Some((token, value)) => {
                out.push_str(value);
                rest = &tail[token.len()..];
            }
            None => {
                out.push('_');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
