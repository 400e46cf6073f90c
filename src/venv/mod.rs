//! Virtual environment creation and relocation.
//!
//! An environment is first created the standard way, linked to the
//! interpreter inside the mounted image, and then relocated so that every
//! reference points at the AppImage file instead of the mount path.

mod builder;
mod context;
mod layout;
mod options;
mod pyvenv_cfg;
mod relocate;
mod templates;

pub use builder::VenvBuilder;
pub use context::{prompt_name, EnvContext};
pub use layout::{VenvLayout, PYVENV_CFG};
pub use options::{EnvOptions, CORE_VENV_DEPS};
pub use pyvenv_cfg::PyvenvCfg;
pub use relocate::{
    relink_interpreter, rewrite_activation_scripts, rewrite_config, substitute, write_pip_conf,
    Relocator, Stage, VENV_BIN_NAME_TOKEN, VENV_DIR_TOKEN, VENV_LIB_DIR_TOKEN, VENV_PROMPT_TOKEN,
};
pub use templates::{TemplateSource, ACTIVATION_SCRIPTS, PIP_CONF, WINDOWS_ACTIVATE};
