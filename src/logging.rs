// 📝 Logging setup
//
// The terminal UI owns the screen, so its logs go to a file. Plain commands
// log to stderr and keep stdout for their output.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,inflation_explainer=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(target: LogTarget<'_>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter());
    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_creates_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explainer.log");
        init(LogTarget::File(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_path_is_error() {
        let err = init(LogTarget::File(Path::new("/no/such/dir/explainer.log"))).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
