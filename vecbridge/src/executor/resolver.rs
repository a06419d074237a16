//! Executor providers and the caching resolver.

use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;

use super::Executor;
use crate::telemetry::BridgeMetrics;

/// Source of a default executor.
///
/// Returning `None` is a normal outcome, not an error: the caller falls back
/// to [`Executor::runtime_default`].
pub trait ExecutorProvider: Send + Sync {
    /// Try to produce an executor for the current context.
    fn discover(&self) -> Option<Executor>;
}

/// Discovers the blocking pool of the tokio runtime the caller is running on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientRuntime;

impl ExecutorProvider for AmbientRuntime {
    fn discover(&self) -> Option<Executor> {
        match Handle::try_current() {
            Ok(handle) => Some(Executor::tokio(handle)),
            Err(e) => {
                tracing::trace!(error = %e, "No ambient tokio runtime");
                None
            }
        }
    }
}

/// Always provides the same executor.
#[derive(Debug, Clone)]
pub struct FixedExecutor(pub Executor);

impl ExecutorProvider for FixedExecutor {
    fn discover(&self) -> Option<Executor> {
        Some(self.0.clone())
    }
}

/// Never discovers anything; every call without an override uses
/// [`Executor::runtime_default`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscovery;

impl ExecutorProvider for NoDiscovery {
    fn discover(&self) -> Option<Executor> {
        None
    }
}

/// Picks the executor for each call and caches the discovered default.
///
/// The cache is filled at most once in effect. Two callers racing on first
/// use may both run discovery; the first write wins and the other result is
/// dropped. No lock is taken on the call path.
pub struct ExecutorResolver {
    provider: Box<dyn ExecutorProvider>,
    cached: OnceLock<Executor>,
    metrics: Arc<BridgeMetrics>,
}

impl ExecutorResolver {
    /// Create a resolver with an empty cache.
    pub fn new(provider: impl ExecutorProvider + 'static, metrics: Arc<BridgeMetrics>) -> Self {
        Self {
            provider: Box::new(provider),
            cached: OnceLock::new(),
            metrics,
        }
    }

    /// Resolve the executor for one call.
    ///
    /// An explicit executor is returned as-is and never cached. Otherwise the
    /// cached executor is reused, or the provider is asked once and its
    /// answer cached.
    pub fn resolve(&self, explicit: Option<&Executor>) -> Option<Executor> {
        if let Some(executor) = explicit {
            return Some(executor.clone());
        }
        if let Some(executor) = self.cached.get() {
            return Some(executor.clone());
        }

        let discovered = self.provider.discover()?;
        self.metrics.executor_resolved();
        tracing::debug!(pool = discovered.label(), "Resolved default executor");

        // On a lost race the winner's executor is returned instead.
        let _ = self.cached.set(discovered);
        self.cached.get().cloned()
    }

    /// The cached executor, if one has been resolved.
    pub fn cached(&self) -> Option<&Executor> {
        self.cached.get()
    }
}

impl std::fmt::Debug for ExecutorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorResolver")
            .field("cached", &self.cached.get())
            .finish_non_exhaustive()
    }
}
