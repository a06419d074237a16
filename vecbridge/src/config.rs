//! Bridge configuration.
//!
//! Configuration is plain structs with `with_*` builders. A [`BridgeConfig`]
//! can also be loaded from an INI file:
//!
//! ```ini
//! [bridge]
//! dedicated_pool = true
//!
//! [pool]
//! threads = 8
//! thread_name = vecbridge-worker
//! stack_size = 2097152
//!
//! [logging]
//! level = vecbridge=debug,info
//! file = /var/log/vecbridge.log
//! ansi = false
//! ```
//!
//! Missing sections or keys keep their defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default thread name prefix for dedicated worker pools.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "vecbridge-worker";

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("failed to load config file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The configuration text is not valid INI.
    #[error("failed to parse config: {0}")]
    Parse(#[from] ini::ParseError),

    /// A key holds a value that cannot be used.
    #[error("invalid value for [{section}] {key}: {value:?}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// Worker pool configuration for a dedicated rayon pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub threads: usize,

    /// Prefix for worker thread names; the thread index is appended.
    pub thread_name_prefix: String,

    /// Worker stack size in bytes. `None` uses rayon's default.
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);

        Self {
            threads,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the worker thread name prefix.
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker stack size in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// Logging configuration consumed by [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,

    /// Optional log file. Logs go to stderr when unset.
    pub file: Option<PathBuf>,

    /// Whether to emit ANSI colors (stderr only).
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Set the filter directive.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Write logs to a file instead of stderr.
    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file = Some(path);
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Top-level configuration for building an
/// [`AsyncVectorStore`](crate::bridge::AsyncVectorStore).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Dedicated pool settings, used when `dedicated_pool` is set.
    pub pool: PoolConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Run blocking calls on a dedicated rayon pool instead of the ambient
    /// tokio runtime's blocking pool.
    pub dedicated_pool: bool,
}

impl BridgeConfig {
    /// Use a dedicated worker pool.
    pub fn with_dedicated_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self.dedicated_pool = true;
        self
    }

    /// Replace the logging settings.
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Load configuration from an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("bridge")) {
            if let Some(raw) = section.get("dedicated_pool") {
                config.dedicated_pool = parse_bool("bridge", "dedicated_pool", raw)?;
            }
        }

        if let Some(section) = ini.section(Some("pool")) {
            apply_pool_section(&mut config.pool, section)?;
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(raw) = section.get("level") {
                let level = raw.trim();
                if EnvFilter::try_new(level).is_err() {
                    return Err(invalid("logging", "level", raw));
                }
                config.logging.level = level.to_string();
            }
            if let Some(file) = section.get("file") {
                let file = file.trim();
                config.logging.file = (!file.is_empty()).then(|| PathBuf::from(file));
            }
            if let Some(raw) = section.get("ansi") {
                config.logging.ansi = parse_bool("logging", "ansi", raw)?;
            }
        }

        Ok(config)
    }
}

fn apply_pool_section(pool: &mut PoolConfig, section: &Properties) -> Result<(), ConfigError> {
    if let Some(raw) = section.get("threads") {
        let threads: usize = parse_value("pool", "threads", raw)?;
        if threads == 0 {
            return Err(invalid("pool", "threads", raw));
        }
        pool.threads = threads;
    }
    if let Some(name) = section.get("thread_name") {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("pool", "thread_name", name));
        }
        pool.thread_name_prefix = name.to_string();
    }
    if let Some(raw) = section.get("stack_size") {
        pool.stack_size = Some(parse_value("pool", "stack_size", raw)?);
    }
    Ok(())
}

fn parse_value<T: FromStr>(section: &str, key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(section, key, raw))
}

fn parse_bool(section: &str, key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(section, key, raw)),
    }
}

fn invalid(section: &str, key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}
