//! Bridge telemetry.
//!
//! Lock-free atomic counters recording what the bridge does with each call:
//! submissions, outcomes, hazard translations, and executor resolutions.
//!
//! # Architecture
//!
//! ```text
//! AsyncVectorStore ─────► BridgeMetrics ─────► BridgeSnapshot ─────► Views
//!                         (atomic counters)    (point-in-time copy)   (logs, tests)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vecbridge::telemetry::BridgeMetrics;
//!
//! let metrics = bridge.metrics();
//! let snapshot = metrics.snapshot();
//! println!("translated: {}", snapshot.translated);
//! ```

mod metrics;
mod snapshot;

pub use metrics::BridgeMetrics;
pub use snapshot::BridgeSnapshot;
