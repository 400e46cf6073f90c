//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Verbosity levels for diagnostics on stderr.
/// - 0: warnings and errors
/// - 1: info (-v, show stages and commands)
/// - 2: debug (-vv, show command output and written files)
/// - 3+: trace
pub type Verbosity = u8;

/// Filter directive for a verbosity level.
pub fn level_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        0 => "appimage_venv=warn",
        1 => "appimage_venv=info",
        2 => "appimage_venv=debug",
        _ => "appimage_venv=trace",
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides `verbosity`.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive(0), "appimage_venv=warn");
        assert_eq!(level_directive(1), "appimage_venv=info");
        assert_eq!(level_directive(2), "appimage_venv=debug");
        assert_eq!(level_directive(9), "appimage_venv=trace");
    }
}
