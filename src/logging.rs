use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "wordset.log";

/// Flushes the file writer on drop. Hold it until the process exits.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|err| {
        eprintln!("invalid log filter {log_level:?} ({err}), falling back to info");
        EnvFilter::new("info")
    })
}

fn file_writer(dir: &Path) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// Installs the global subscriber: stdout always, plus a daily file under
/// `config.log_dir` when one is set and writable.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let file = config.log_dir.as_deref().and_then(|dir| match file_writer(dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("file logging disabled, cannot use {}: {err}", dir.display());
            None
        }
    });

    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false).with_target(true)),
            Some(FileLogGuard { _guard: guard }),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    if let Some(dir) = config.log_dir.as_deref().filter(|_| guard.is_some()) {
        tracing::info!(log_dir = %dir.display(), "file logging enabled");
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("logs");

        let (_writer, _guard) = file_writer(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_file_writer_rejects_file_path() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        assert!(file_writer(&blocker.join("logs")).is_err());
    }
}
