//! `appimage-venv create` command implementation.

use crate::error::Result;
use crate::host::HostEnv;
use crate::python::{resolve_interpreter, PythonProbe};
use crate::venv::{EnvContext, EnvOptions, Relocator, TemplateSource, VenvBuilder};
use std::path::PathBuf;

/// Arguments for the create command.
pub struct CreateArgs {
    /// Environment directories to create
    pub dirs: Vec<PathBuf>,
    /// Creation options
    pub options: EnvOptions,
    /// Interpreter to create from (default: the AppImage)
    pub python: Option<PathBuf>,
    /// Template source for activation scripts and pip.conf
    pub templates: TemplateSource,
    /// The AppImage the environments are relocated to
    pub host: HostEnv,
}

/// Execute the create command.
pub fn execute(args: CreateArgs) -> Result<()> {
    args.options.validate()?;

    let interpreter = resolve_interpreter(
        args.python
            .as_deref()
            .unwrap_or_else(|| args.host.executable()),
    )?;

    println!("Querying Python interpreter...");
    let python = PythonProbe::new(&interpreter).info()?;
    tracing::info!(
        interpreter = %interpreter.display(),
        base = python.base_interpreter(),
        version = %python.python_version(),
        "probed interpreter"
    );

    let builder = VenvBuilder::new(args.options);
    let relocator = Relocator::new(args.templates);

    for dir in &args.dirs {
        println!("Creating venv at {}...", dir.display());
        builder.create(dir, &python)?;
        println!("  Created pyvenv.cfg");
        println!("  Created Python links");

        let ctx = EnvContext::build(
            dir,
            &args.host,
            python.python_version(),
            builder.options().prompt.as_deref(),
        )?;
        relocator.relocate(&ctx)?;
        println!("  Relocated to {}", ctx.executable().display());
    }

    println!();
    println!("Done. Activate with:");
    for dir in &args.dirs {
        println!("  source {}", dir.join("bin").join("activate").display());
    }

    Ok(())
}
