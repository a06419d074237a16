//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events. Binaries and tests that
//! want to see them call [`init_logging`] once at startup.

use std::io;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive from `RUST_LOG` or the config is malformed.
    #[error("invalid log filter {directive:?}: {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },

    /// The log file or its directory could not be created.
    #[error("failed to open log file: {0}")]
    Io(#[from] io::Error),
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. A malformed directive from
/// either source is an error. When `config.file` is set, output goes through a
/// non-blocking file writer and the returned guard must be kept alive to
/// flush it.
///
/// Returns `Ok(None)` when logging goes to stderr. A subscriber that is
/// already installed is left in place.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let directive = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.level.clone());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|source| LoggingError::Filter { directive, source })?;

    match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_thread_names(true)
                .with_writer(writer)
                .try_init();

            Ok(Some(guard))
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(config.ansi)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .try_init();

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_to_file_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bridge.log");
        let config = LoggingConfig::default().with_file(path.clone());

        let guard = init_logging(&config).unwrap();

        assert!(guard.is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = LoggingConfig::default().with_level("warn");
        assert!(init_logging(&config).unwrap().is_none());
        assert!(init_logging(&config).unwrap().is_none());
    }

    #[test]
    fn test_init_logging_rejects_bad_level() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }
        let config = LoggingConfig::default().with_level("vecbridge=loud");

        let err = init_logging(&config).unwrap_err();

        match err {
            LoggingError::Filter { directive, .. } => assert_eq!(directive, "vecbridge=loud"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
