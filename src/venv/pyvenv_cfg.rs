//! `pyvenv.cfg` reading and rewriting.
//!
//! The file is a handful of `key = value` lines. It is kept as raw lines so
//! that a rewrite only touches the line being changed.

use crate::error::Result;
use crate::python::PythonVersion;
use std::fs;
use std::io::Write;
use std::path::Path;

/// In-memory copy of a `pyvenv.cfg` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyvenvCfg {
    lines: Vec<String>,
}

impl PyvenvCfg {
    /// Read the whole file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Split text into lines, keeping line terminators.
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Value of the first `key = value` line for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
    }

    /// Replace every `home =` line. Returns false if there was none.
    pub fn set_home(&mut self, home: &str) -> bool {
        let mut found = false;
        for line in self.lines.iter_mut().filter(|l| l.starts_with("home =")) {
            *line = format!("home = {}\n", home);
            found = true;
        }
        found
    }

    /// Interpreter version recorded by the creator.
    pub fn version(&self) -> Option<PythonVersion> {
        self.get("version")
            .or_else(|| self.get("version_info"))
            .and_then(|v| v.parse().ok())
    }

    /// Prompt recorded with `--prompt`, without surrounding quotes.
    pub fn prompt(&self) -> Option<&str> {
        self.get("prompt").map(|p| {
            p.strip_prefix('\'')
                .and_then(|p| p.strip_suffix('\''))
                .or_else(|| p.strip_prefix('"').and_then(|p| p.strip_suffix('"')))
                .unwrap_or(p)
        })
    }

    /// Full file content.
    pub fn contents(&self) -> String {
        self.lines.concat()
    }

    /// Write a complete replacement of `path` via a sibling temp file.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.contents().as_bytes())
    }
}

/// Replace `path` with `contents` so readers never see a truncated file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    // Keep the mode of the file being replaced; new files get 0644
    match fs::metadata(path) {
        Ok(meta) => fs::set_permissions(tmp.path(), meta.permissions())?,
        Err(_) => set_default_mode(tmp.path())?,
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_default_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_default_mode(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CFG: &str = "home = /tmp/.mount_abc/usr/bin\n\
                       include-system-site-packages = false\n\
                       version = 3.10.12\n\
                       prompt = 'demo'\n";

    #[test]
    fn test_get_values() {
        let cfg = PyvenvCfg::parse(CFG);
        assert_eq!(cfg.get("home"), Some("/tmp/.mount_abc/usr/bin"));
        assert_eq!(cfg.get("include-system-site-packages"), Some("false"));
        assert_eq!(cfg.get("missing"), None);
        assert_eq!(cfg.version(), Some(PythonVersion::new(3, 10)));
        assert_eq!(cfg.prompt(), Some("demo"));
    }

    #[test]
    fn test_set_home_touches_only_home_line() {
        let mut cfg = PyvenvCfg::parse(CFG);
        assert!(cfg.set_home("/opt/Python.AppImage"));

        let before: Vec<&str> = CFG.lines().collect();
        let contents = cfg.contents();
        let after: Vec<&str> = contents.lines().collect();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], "home = /opt/Python.AppImage");
        assert_eq!(after[1..], before[1..]);
    }

    #[test]
    fn test_set_home_missing() {
        let mut cfg = PyvenvCfg::parse("version = 3.10.12\n");
        assert!(!cfg.set_home("/opt/Python.AppImage"));
        assert_eq!(cfg.contents(), "version = 3.10.12\n");
    }

    #[test]
    fn test_keeps_missing_trailing_newline() {
        let cfg = PyvenvCfg::parse("version = 3.10.12\nprompt = x");
        assert_eq!(cfg.contents(), "version = 3.10.12\nprompt = x");
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(crate::venv::PYVENV_CFG);
        fs::write(&path, CFG).unwrap();

        let mut cfg = PyvenvCfg::read(&path).unwrap();
        cfg.set_home("/opt/Python.AppImage");
        cfg.write_atomic(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("home = /opt/Python.AppImage\n"));
        assert!(written.ends_with("prompt = 'demo'\n"));
        // No temp files left behind
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pip.conf");
        write_atomic(&path, b"[global]\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[global]\n");
    }
}
