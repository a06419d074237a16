//! vecbridge - async access to blocking vector stores
//!
//! This library wraps a synchronous [`VectorStore`](store::VectorStore)
//! implementation and exposes its operations as `async fn`s that run the
//! blocking calls on a worker pool, keeping the async scheduler's threads
//! free.
//!
//! # Modules
//!
//! - [`store`]: the blocking store trait, documents, and store errors
//! - [`bridge`]: [`AsyncVectorStore`](bridge::AsyncVectorStore) and the
//!   submit-and-await primitive
//! - [`executor`]: worker pools and executor resolution
//! - [`config`]: pool, logging, and bridge configuration
//! - [`logging`]: tracing subscriber setup
//! - [`telemetry`]: bridge counters

pub mod bridge;
pub mod config;
pub mod executor;
pub mod logging;
pub mod store;
pub mod telemetry;

pub use bridge::{AsyncVectorStore, BridgeError, BridgeResult, SearchOptions};
pub use executor::Executor;
pub use store::{Document, StoreError, VectorStore};
