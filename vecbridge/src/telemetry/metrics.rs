//! Atomic counters for bridge activity.

use std::sync::atomic::{AtomicU64, Ordering};

use super::BridgeSnapshot;

/// Counters shared by a bridge, its resolver, and its submitted work.
///
/// All updates use `Relaxed` ordering; the counters are independent and only
/// read through [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    submitted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    translated: AtomicU64,
    panicked: AtomicU64,
    resolutions: AtomicU64,
    default_pool_fallbacks: AtomicU64,
}

impl BridgeMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A unit of work was handed to a worker pool.
    pub fn task_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A unit of work returned a value.
    pub fn task_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// A unit of work returned an error (translated or not).
    pub fn task_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// An exhaustion error was replaced with a runtime failure.
    pub fn exhaustion_translated(&self) {
        self.translated.fetch_add(1, Ordering::Relaxed);
    }

    /// A store call panicked on the worker.
    pub fn task_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// The executor provider produced a new executor.
    pub fn executor_resolved(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// No executor resolved; the call ran on the runtime or fallback pool.
    pub fn default_pool_used(&self) {
        self.default_pool_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of provider discoveries so far.
    pub fn resolutions(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Takes a point-in-time copy of every counter.
    pub fn snapshot(&self) -> BridgeSnapshot {
        BridgeSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            translated: self.translated.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            default_pool_fallbacks: self.default_pool_fallbacks.load(Ordering::Relaxed),
        }
    }
}
