//! Errors returned by the async bridge.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors an awaiting caller can receive from the bridge.
///
/// Store errors enter only through [`translate`](super::translate); there is
/// no `From<StoreError>` impl.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The store call failed; the original error is passed through as-is.
    #[error(transparent)]
    Store(StoreError),

    /// The store call raised the exhaustion signal.
    ///
    /// The original error is kept as the source.
    #[error("runtime failure: blocking call raised an exhaustion signal")]
    Runtime {
        #[source]
        source: StoreError,
    },

    /// The store call panicked on the worker thread.
    #[error("blocking call panicked: {0}")]
    Panicked(String),

    /// The worker pool dropped the call without running it to completion,
    /// e.g. because its runtime shut down.
    #[error("worker pool dropped the call before it completed")]
    WorkerLost,
}

impl BridgeError {
    /// The passed-through store error, if this is one.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            BridgeError::Store(e) => Some(e),
            _ => None,
        }
    }

    /// True for a translated exhaustion signal.
    pub fn is_runtime_failure(&self) -> bool {
        matches!(self, BridgeError::Runtime { .. })
    }
}
