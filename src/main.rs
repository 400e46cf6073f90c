//! appimage-venv CLI entry point.

use appimage_venv::commands::{create, relocate};
use appimage_venv::config::Config;
use appimage_venv::error::{AppImageVenvError, Result};
use appimage_venv::host::{not_in_appimage_message, HostEnv};
use appimage_venv::logging;
use appimage_venv::venv::{EnvOptions, TemplateSource};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "appimage-venv")]
#[command(about = "Create virtual Python environments that run from an AppImage")]
#[command(version)]
#[command(author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory with scripts/ and configs/ template overrides
    #[arg(long, global = true, env = "APPIMAGE_VENV_TEMPLATES")]
    templates: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Create virtual Python environments in one or more target directories
    #[command(after_help = "Once an environment has been created, you may wish to activate it, \
                            e.g. by sourcing an activate script in its bin directory.")]
    Create {
        /// A directory to create the environment in
        #[arg(value_name = "ENV_DIR", required = true)]
        dirs: Vec<PathBuf>,

        /// Give the virtual environment access to the system site-packages dir
        #[arg(long = "system-site-packages")]
        system_site: bool,

        /// Try to use symlinks rather than copies
        #[arg(long, conflicts_with = "copies")]
        symlinks: bool,

        /// Try to use copies rather than symlinks
        #[arg(long)]
        copies: bool,

        /// Delete the contents of the environment directory if it already exists
        #[arg(long)]
        clear: bool,

        /// Upgrade the environment directory to use this version of Python
        #[arg(long)]
        upgrade: bool,

        /// Skip installing or upgrading pip in the virtual environment
        #[arg(long)]
        without_pip: bool,

        /// Provides an alternative prompt prefix for this environment
        #[arg(long)]
        prompt: Option<String>,

        /// Upgrade core dependencies (pip, setuptools) to the latest version in PyPI
        #[arg(long)]
        upgrade_deps: bool,

        /// Interpreter to create the environment from (default: $APPIMAGE)
        #[arg(long, env = "APPIMAGE_VENV_PYTHON")]
        python: Option<PathBuf>,
    },

    /// Repoint existing environments at the running AppImage
    Relocate {
        /// An existing environment directory
        #[arg(value_name = "ENV_DIR", required = true)]
        dirs: Vec<PathBuf>,

        /// Prompt prefix (default: the one recorded in pyvenv.cfg)
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    if let Err(e) = run_cli() {
        match &e {
            AppImageVenvError::NotInAppImage(_) => {
                for line in not_in_appimage_message() {
                    println!("{}", line);
                }
            }
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(e.exit_code());
    }
}

fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Everything but completions runs inside an AppImage. Conflicting flags
    // are rejected first, then the host, before the config is even read.
    let host = match &cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "appimage-venv", &mut io::stdout());
            return Ok(());
        }
        Command::Create { clear, upgrade, .. } => {
            EnvOptions {
                clear: *clear,
                upgrade: *upgrade,
                ..Default::default()
            }
            .validate()?;
            HostEnv::from_env()?
        }
        Command::Relocate { .. } => HostEnv::from_env()?,
    };

    // Load optional config
    let config = Config::load_from_cwd()?.unwrap_or_default();

    // Template directory (CLI > config > embedded)
    let templates = match cli.templates.or(config.templates_dir.clone()) {
        Some(dir) => TemplateSource::Directory(dir),
        None => TemplateSource::Embedded,
    };

    match cli.command {
        Command::Create {
            dirs,
            system_site,
            symlinks,
            copies,
            clear,
            upgrade,
            without_pip,
            prompt,
            upgrade_deps,
            python,
        } => {
            let options = EnvOptions {
                system_site_packages: system_site || config.system_site_packages,
                clear,
                symlinks: symlinks || !(copies || config.copies),
                upgrade,
                with_pip: !(without_pip || config.without_pip),
                prompt: prompt.or(config.prompt),
                upgrade_deps,
            };
            tracing::debug!(?options, "create options");

            create::execute(create::CreateArgs {
                dirs,
                options,
                python: python.or(config.python),
                templates,
                host,
            })
        }

        Command::Relocate { dirs, prompt } => relocate::execute(relocate::RelocateArgs {
            dirs,
            prompt,
            templates,
            host,
        }),

        Command::Completions { .. } => Ok(()),
    }
}
