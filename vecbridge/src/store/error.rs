//! Error types raised by synchronous store implementations.

use std::io;

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a [`VectorStore`](super::VectorStore) may return.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An iterator or cursor inside the store ran out of values.
    ///
    /// The bridge never hands this kind back to an async caller as-is; it is
    /// replaced with [`BridgeError::Runtime`](crate::bridge::BridgeError::Runtime).
    #[error("no further values: {0}")]
    Exhausted(String),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied arguments the store rejects.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing database reported a failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error talking to the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Returns true for the "no further values" kind.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, StoreError::Exhausted(_))
    }
}
