//! Interpreter path resolution.

use crate::error::{AppImageVenvError, Result};
use std::path::{Path, PathBuf};

/// Check if a path is executable.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve the interpreter used to create environments.
///
/// A value containing a path separator is taken as a path; a bare name
/// such as `python3` is looked up on `PATH`.
pub fn resolve_interpreter(spec: &Path) -> Result<PathBuf> {
    if spec.components().count() == 1 && !spec.is_absolute() {
        let found = which::which(spec)?;
        tracing::debug!(name = %spec.display(), path = %found.display(), "resolved interpreter on PATH");
        return Ok(found);
    }

    if !is_executable(spec) {
        return Err(AppImageVenvError::InvalidExecutable(format!(
            "{} is not an executable file",
            spec.display()
        )));
    }

    Ok(spec.to_path_buf())
}
