//! Synchronous vector store interface.
//!
//! The [`VectorStore`] trait is the blocking API that the async bridge wraps.
//! Implementations own everything about storage: connection handling,
//! similarity scoring, collection management. The bridge only calls these
//! methods from worker threads.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync + 'static`. The bridge shares a single
//! store instance across every worker thread without any locking of its own,
//! so concurrent calls into the store are the store's responsibility.
//!
//! # Example
//!
//! ```ignore
//! use vecbridge::store::{AddOptions, Document, Filter, StoreResult, VectorStore};
//!
//! struct PgStore { /* connection pool, collection name, ... */ }
//!
//! impl VectorStore for PgStore {
//!     fn get_all_ids(&self) -> StoreResult<Vec<String>> {
//!         // SELECT custom_id FROM embeddings ...
//!     }
//!     // ...
//! }
//! ```

mod document;
mod error;

pub use document::{AddOptions, Document, Filter, Metadata};
pub use error::{StoreError, StoreResult};

/// Blocking vector store operations.
///
/// Each method blocks the calling thread until the backing store answers.
/// Never call these directly from an async task; go through
/// [`AsyncVectorStore`](crate::bridge::AsyncVectorStore) instead.
pub trait VectorStore: Send + Sync + 'static {
    /// Returns every document identifier in the collection, in store order.
    fn get_all_ids(&self) -> StoreResult<Vec<String>>;

    /// Returns the subsequence of `ids` that actually exist in the store.
    fn get_filtered_ids(&self, ids: &[String]) -> StoreResult<Vec<String>>;

    /// Fetches the documents stored under `ids`.
    fn get_documents_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Document>>;

    /// Deletes documents.
    ///
    /// `None` means every document, following the store's own semantics.
    /// When `collection_only` is set, the deletion is scoped to the current
    /// collection.
    fn delete(&self, ids: Option<Vec<String>>, collection_only: bool) -> StoreResult<()>;

    /// Returns up to `k` `(document, score)` pairs closest to `embedding`.
    ///
    /// Ordering and scoring are entirely up to the implementation.
    fn similarity_search_with_score_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&Filter>,
    ) -> StoreResult<Vec<(Document, f32)>>;

    /// Inserts `documents`, returning the identifiers they were stored under.
    ///
    /// `options` are implementation-defined and passed through untouched.
    fn add_documents(
        &self,
        documents: Vec<Document>,
        ids: Option<Vec<String>>,
        options: AddOptions,
    ) -> StoreResult<Vec<String>>;
}
