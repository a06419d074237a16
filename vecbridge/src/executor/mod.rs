//! Worker pools and executor resolution.
//!
//! An [`Executor`] is a cheap, cloneable handle to a [`WorkerPool`]: a set of
//! threads that run blocking closures off the async scheduler's threads.
//!
//! # Available Pools
//!
//! - [`TokioBlockingPool`]: the blocking pool of a tokio runtime, reached
//!   through a runtime `Handle`
//! - [`RayonPool`]: a dedicated rayon thread pool built from a
//!   [`PoolConfig`](crate::config::PoolConfig)
//! - [`DefaultPool`]: a process-wide rayon pool for calls made outside any
//!   tokio runtime
//!
//! # Resolution
//!
//! ```text
//! explicit override ──► use it (no caching)
//!        │ none
//!        ▼
//! cached executor ────► reuse it
//!        │ none
//!        ▼
//! ExecutorProvider ───► Some: cache + use
//!                       None: current runtime's blocking pool,
//!                             else DefaultPool
//! ```

mod pool;
mod resolver;

use std::fmt;
use std::sync::Arc;

pub use pool::{
    DefaultPool, PoolError, RayonPool, TokioBlockingPool, FALLBACK_MIN_THREADS,
    FALLBACK_THREAD_NAME_PREFIX,
};
pub use resolver::{AmbientRuntime, ExecutorProvider, ExecutorResolver, FixedExecutor, NoDiscovery};

/// A unit of blocking work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A set of threads that can run blocking jobs.
///
/// `submit` must not block the caller waiting for the job; it only hands the
/// job to the pool. Jobs report their own results.
pub trait WorkerPool: Send + Sync {
    /// Short name for logging.
    fn label(&self) -> &str;

    /// Schedule `job` on one of the pool's threads.
    fn submit(&self, job: Job);
}

/// Handle to a worker pool.
#[derive(Clone)]
pub struct Executor {
    pool: Arc<dyn WorkerPool>,
}

impl Executor {
    /// Wrap a worker pool.
    pub fn new(pool: impl WorkerPool + 'static) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Executor backed by the blocking pool of the given tokio runtime.
    pub fn tokio(handle: tokio::runtime::Handle) -> Self {
        Self::new(TokioBlockingPool::new(handle))
    }

    /// Executor backed by the process-wide [`DefaultPool`].
    pub fn default_pool() -> Self {
        Self::new(DefaultPool)
    }

    /// Executor for a call where nothing resolved.
    ///
    /// The blocking pool of the tokio runtime the caller is running on, or
    /// the [`DefaultPool`] when there is none.
    pub fn runtime_default() -> Self {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Self::tokio(handle),
            Err(_) => Self::default_pool(),
        }
    }

    /// Short name of the underlying pool.
    pub fn label(&self) -> &str {
        self.pool.label()
    }

    /// Hand a job to the underlying pool.
    pub fn submit(&self, job: Job) {
        self.pool.submit(job);
    }

    /// True if both handles point at the same pool instance.
    pub fn ptr_eq(a: &Executor, b: &Executor) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&a.pool).cast::<()>(),
            Arc::as_ptr(&b.pool).cast::<()>(),
        )
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("pool", &self.label())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_ptr_eq_tracks_identity() {
        let a = Executor::default_pool();
        let b = a.clone();
        let c = Executor::default_pool();

        assert!(Executor::ptr_eq(&a, &b));
        assert!(!Executor::ptr_eq(&a, &c));
    }

    #[test]
    fn test_default_pool_runs_job() {
        let executor = Executor::default_pool();
        let (tx, rx) = mpsc::channel();

        executor.submit(Box::new(move || {
            tx.send(7).unwrap();
        }));

        assert_eq!(rx.recv().unwrap(), 7);
    }

    #[test]
    fn test_runtime_default_outside_runtime() {
        assert_eq!(Executor::runtime_default().label(), "default");
    }

    #[tokio::test]
    async fn test_runtime_default_inside_runtime() {
        assert_eq!(Executor::runtime_default().label(), "tokio-blocking");
    }

    #[test]
    fn test_debug_shows_label() {
        let executor = Executor::default_pool();
        assert!(format!("{:?}", executor).contains("default"));
    }
}
