use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file; used while the TUI owns the terminal
    File(PathBuf),
    Stderr,
}

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(target: &LogTarget, verbose: bool) -> &'static str {
    match (target, verbose) {
        (_, true) => "debug",
        (LogTarget::File(_), false) => "info",
        // Keep subcommand output clean unless something goes wrong
        (LogTarget::Stderr, false) => "warn",
    }
}

pub fn init_logging(target: LogTarget, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&target, verbose)));

    let (writer, ansi) = match target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        let file = LogTarget::File(PathBuf::from("x.log"));
        assert_eq!(default_filter(&file, false), "info");
        assert_eq!(default_filter(&LogTarget::Stderr, false), "warn");
        assert_eq!(default_filter(&LogTarget::Stderr, true), "debug");
    }

    #[test]
    fn test_file_target_creates_parent_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested/dir/app.log");

        // A global subscriber may already be set by another test; the file must exist either way
        let _ = init_logging(LogTarget::File(path.clone()), false);
        assert!(path.exists());
    }
}
