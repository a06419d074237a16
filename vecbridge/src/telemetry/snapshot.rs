//! Point-in-time view of bridge counters.

use std::fmt;

/// Copy of [`BridgeMetrics`](super::BridgeMetrics) at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeSnapshot {
    /// Units of work handed to a pool.
    pub submitted: u64,
    /// Units of work that returned a value.
    pub succeeded: u64,
    /// Units of work that returned an error.
    pub failed: u64,
    /// Exhaustion errors replaced with runtime failures.
    pub translated: u64,
    /// Store calls that panicked.
    pub panicked: u64,
    /// Executors produced by the provider.
    pub resolutions: u64,
    /// Calls with no resolved executor, run on the fallback pool.
    pub default_pool_fallbacks: u64,
}

impl fmt::Display for BridgeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submitted={} succeeded={} failed={} translated={} panicked={} resolutions={} fallbacks={}",
            self.submitted,
            self.succeeded,
            self.failed,
            self.translated,
            self.panicked,
            self.resolutions,
            self.default_pool_fallbacks
        )
    }
}
