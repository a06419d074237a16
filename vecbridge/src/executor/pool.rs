//! Worker pool implementations.

use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tokio::runtime::Handle;

use super::{Job, WorkerPool};
use crate::config::PoolConfig;

/// Minimum thread count of the process-wide fallback pool.
pub const FALLBACK_MIN_THREADS: usize = 16;

/// Thread name prefix of the process-wide fallback pool.
pub const FALLBACK_THREAD_NAME_PREFIX: &str = "vecbridge-fallback";

static FALLBACK_POOL: OnceLock<Option<RayonPool>> = OnceLock::new();

/// Errors that can occur while building a worker pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Rayon refused to build the pool.
    #[error("failed to build worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),

    /// The configuration asks for zero threads.
    #[error("worker pool needs at least one thread")]
    NoThreads,
}

/// The blocking thread pool of a tokio runtime.
///
/// Jobs go through `Handle::spawn_blocking`. If the runtime has shut down the
/// job is dropped without running; the bridge reports that as
/// [`BridgeError::WorkerLost`](crate::bridge::BridgeError::WorkerLost).
#[derive(Debug, Clone)]
pub struct TokioBlockingPool {
    handle: Handle,
}

impl TokioBlockingPool {
    /// Wrap a runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl WorkerPool for TokioBlockingPool {
    fn label(&self) -> &str {
        "tokio-blocking"
    }

    fn submit(&self, job: Job) {
        // Detached: the job reports through its own channel.
        drop(self.handle.spawn_blocking(job));
    }
}

/// A dedicated rayon thread pool.
#[derive(Debug, Clone)]
pub struct RayonPool {
    pool: Arc<rayon::ThreadPool>,
    label: String,
}

impl RayonPool {
    /// Build a pool from configuration.
    pub fn build(config: &PoolConfig) -> Result<Self, PoolError> {
        if config.threads == 0 {
            return Err(PoolError::NoThreads);
        }

        let prefix = config.thread_name_prefix.clone();
        let mut builder = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(move |index| format!("{}-{}", prefix, index));
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let pool = builder.build()?;

        tracing::info!(
            threads = config.threads,
            prefix = %config.thread_name_prefix,
            "Created dedicated worker pool"
        );

        Ok(Self {
            pool: Arc::new(pool),
            label: config.thread_name_prefix.clone(),
        })
    }

    /// Number of threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl WorkerPool for RayonPool {
    fn label(&self) -> &str {
        &self.label
    }

    fn submit(&self, job: Job) {
        self.pool.spawn(job);
    }
}

/// Process-wide pool for blocking calls made outside any tokio runtime.
///
/// A dedicated rayon pool with at least [`FALLBACK_MIN_THREADS`] threads,
/// built on first use and kept for the life of the process. Rayon's global
/// pool is not used: it has one thread per CPU and is meant for compute work.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPool;

impl DefaultPool {
    fn pool() -> Option<&'static RayonPool> {
        FALLBACK_POOL
            .get_or_init(|| {
                let config = PoolConfig::default();
                let config = PoolConfig {
                    threads: config.threads.saturating_mul(2).max(FALLBACK_MIN_THREADS),
                    thread_name_prefix: FALLBACK_THREAD_NAME_PREFIX.to_string(),
                    stack_size: None,
                };
                match RayonPool::build(&config) {
                    Ok(pool) => Some(pool),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to build fallback worker pool");
                        None
                    }
                }
            })
            .as_ref()
    }
}

impl WorkerPool for DefaultPool {
    fn label(&self) -> &str {
        "default"
    }

    fn submit(&self, job: Job) {
        match Self::pool() {
            Some(pool) => pool.submit(job),
            None => {
                // One thread per job; a failed spawn drops the job, which the
                // caller sees as a lost worker.
                let spawned = std::thread::Builder::new()
                    .name(FALLBACK_THREAD_NAME_PREFIX.to_string())
                    .spawn(job);
                if let Err(e) = spawned {
                    tracing::warn!(error = %e, "Failed to spawn fallback worker thread");
                }
            }
        }
    }
}
