//! Tracing subscriber setup for the binary.
//!
//! Filtering follows `RUST_LOG` and defaults to `warn`. While the TUI is up
//! the terminal belongs to the UI, so logs go to a file instead of stderr.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(target: LogTarget) -> io::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter());
    let result = match target {
        LogTarget::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_target_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("pacer.log");
        init(LogTarget::File(path.clone())).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn init_twice_is_harmless() {
        init(LogTarget::Stderr).unwrap();
        init(LogTarget::Stderr).unwrap();
    }
}
