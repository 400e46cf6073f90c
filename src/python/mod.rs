//! Python interpreter discovery and probing.

mod detect;
mod probe;
mod version;

pub use detect::{is_executable, resolve_interpreter};
pub use probe::{PythonInfo, PythonProbe};
pub use version::PythonVersion;
