//! Python interpreter execution.

use super::PythonVersion;
use crate::error::{AppImageVenvError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const JSON_START: &str = "APPIMAGE_VENV_JSON_START";
const JSON_END: &str = "APPIMAGE_VENV_JSON_END";

const PROBE_CODE: &str = r#"
import json
import sys
info = {
    "executable": sys.executable,
    "base_executable": getattr(sys, "_base_executable", None),
    "version": sys.version,
    "major": sys.version_info[0],
    "minor": sys.version_info[1],
    "micro": sys.version_info[2],
    "prefix": sys.prefix,
}
print("APPIMAGE_VENV_JSON_START")
print(json.dumps(info))
print("APPIMAGE_VENV_JSON_END")
"#;

/// Wrapper for running a Python interpreter.
pub struct PythonProbe {
    executable: PathBuf,
}

impl PythonProbe {
    /// Create a probe for the given interpreter.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Get the path to the interpreter.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run the interpreter with the given arguments, failing on non-zero exit.
    pub fn run_module<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        tracing::info!(
            "Executing: {} {}",
            self.executable.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.executable)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        log_output(&output);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(AppImageVenvError::PythonCommandFailed(format!(
                "exit code: {:?}\nstdout: {}\nstderr: {}",
                output.status.code(),
                stdout,
                stderr
            )));
        }

        Ok(output)
    }

    /// Query the interpreter for its location and version.
    pub fn info(&self) -> Result<PythonInfo> {
        let output = self.run_module(["-c", PROBE_CODE])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        PythonInfo::from_probe_output(&stdout)
    }
}

fn log_output(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.is_empty() {
        tracing::debug!("stdout:\n{}", stdout);
    }
    if !stderr.is_empty() {
        tracing::debug!("stderr:\n{}", stderr);
    }
}

/// Interpreter information reported by the probe.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct PythonInfo {
    pub executable: String,
    #[serde(default)]
    pub base_executable: Option<String>,
    pub version: String,
    pub major: u32,
    pub minor: u32,
    #[serde(default)]
    pub micro: u32,
    pub prefix: String,
}

impl PythonInfo {
    /// Extract the JSON document printed between the probe markers.
    pub fn from_probe_output(stdout: &str) -> Result<Self> {
        let start = stdout
            .find(JSON_START)
            .ok_or_else(|| AppImageVenvError::PythonCommandFailed("JSON output not found".into()))?;
        let end = stdout
            .find(JSON_END)
            .ok_or_else(|| AppImageVenvError::PythonCommandFailed("JSON output not found".into()))?;
        if end < start {
            return Err(AppImageVenvError::PythonCommandFailed(
                "malformed probe output".into(),
            ));
        }

        let json_str = stdout[start + JSON_START.len()..end].trim();
        Ok(serde_json::from_str(json_str)?)
    }

    /// `major.minor` of the interpreter.
    pub fn python_version(&self) -> PythonVersion {
        PythonVersion::new(self.major, self.minor)
    }

    /// Interpreter the environment links to at creation time.
    pub fn base_interpreter(&self) -> &str {
        self.base_executable
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.executable)
    }

    /// Full version string, e.g. `3.10.12`.
    pub fn full_version(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.micro)
    }
}
