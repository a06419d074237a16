//! Async bridge over a blocking [`VectorStore`].
//!
//! [`AsyncVectorStore`] exposes each blocking store operation as an
//! `async fn` with the same arguments plus an optional executor override.
//! Every method does three things: resolve an executor, submit the blocking
//! call through [`run_blocking`]'s machinery, and return the outcome.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │              async caller (tokio)          │
//! └──────────────────────┬─────────────────────┘
//!                        │ .await
//!                        ▼
//! ┌────────────────────────────────────────────┐
//! │              AsyncVectorStore<S>           │
//! │                                            │
//! │  ExecutorResolver ──► submit ──► oneshot   │
//! └──────────────────────┬─────────────────────┘
//!                        │ Job
//!                        ▼
//! ┌────────────────────────────────────────────┐
//! │   WorkerPool thread: S::blocking_method()  │
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vecbridge::bridge::{AsyncVectorStore, SearchOptions};
//!
//! let bridge = AsyncVectorStore::new(Arc::new(pg_store));
//! let ids = bridge.get_all_ids(None).await?;
//! let hits = bridge
//!     .similarity_search(embedding, SearchOptions::default().with_k(10), None)
//!     .await?;
//! ```
//!
//! # Concurrency
//!
//! Calls are independent units of work; concurrent calls on one bridge have
//! no ordering guarantee. Dropping a call's future does not interrupt the
//! worker. There are no timeouts; wrap the await with
//! `tokio::time::timeout` if needed.

mod error;
mod submit;

use std::sync::Arc;

pub use error::{BridgeError, BridgeResult};
pub use submit::{run_blocking, translate};

use crate::config::BridgeConfig;
use crate::executor::{
    AmbientRuntime, Executor, ExecutorProvider, ExecutorResolver, FixedExecutor, PoolError,
    RayonPool,
};
use crate::store::{AddOptions, Document, Filter, StoreResult, VectorStore};
use crate::telemetry::BridgeMetrics;

/// Default number of similarity search results.
pub const DEFAULT_SEARCH_K: usize = 4;

/// Similarity search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of results.
    pub k: usize,

    /// Optional metadata filter, interpreted by the store.
    pub filter: Option<Filter>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_SEARCH_K,
            filter: None,
        }
    }
}

impl SearchOptions {
    /// Set the result count.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the metadata filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Async wrapper around a shared blocking store.
pub struct AsyncVectorStore<S> {
    store: Arc<S>,
    resolver: ExecutorResolver,
    metrics: Arc<BridgeMetrics>,
}

impl<S: VectorStore> AsyncVectorStore<S> {
    /// Bridge that runs calls on the ambient tokio runtime's blocking pool.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_provider(store, AmbientRuntime)
    }

    /// Bridge with a custom source for the default executor.
    pub fn with_provider(store: Arc<S>, provider: impl ExecutorProvider + 'static) -> Self {
        let metrics = Arc::new(BridgeMetrics::new());
        Self {
            store,
            resolver: ExecutorResolver::new(provider, Arc::clone(&metrics)),
            metrics,
        }
    }

    /// Bridge configured from a [`BridgeConfig`].
    ///
    /// With `dedicated_pool` set, a rayon pool is built and used as the
    /// default executor; otherwise the ambient runtime is used.
    pub fn from_config(store: Arc<S>, config: &BridgeConfig) -> Result<Self, PoolError> {
        if config.dedicated_pool {
            let pool = RayonPool::build(&config.pool)?;
            Ok(Self::with_provider(store, FixedExecutor(Executor::new(pool))))
        } else {
            Ok(Self::new(store))
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Counters for this bridge.
    pub fn metrics(&self) -> &Arc<BridgeMetrics> {
        &self.metrics
    }

    /// The cached default executor, once resolved.
    pub fn cached_executor(&self) -> Option<&Executor> {
        self.resolver.cached()
    }

    /// List every identifier in the store.
    pub async fn get_all_ids(&self, executor: Option<&Executor>) -> BridgeResult<Vec<String>> {
        self.call("get_all_ids", executor, S::get_all_ids).await
    }

    /// Return the subset of `ids` present in the store.
    pub async fn get_filtered_ids(
        &self,
        ids: Vec<String>,
        executor: Option<&Executor>,
    ) -> BridgeResult<Vec<String>> {
        self.call("get_filtered_ids", executor, move |store| {
            store.get_filtered_ids(&ids)
        })
        .await
    }

    /// Fetch documents by identifier.
    pub async fn get_documents_by_ids(
        &self,
        ids: Vec<String>,
        executor: Option<&Executor>,
    ) -> BridgeResult<Vec<Document>> {
        self.call("get_documents_by_ids", executor, move |store| {
            store.get_documents_by_ids(&ids)
        })
        .await
    }

    /// Delete documents.
    ///
    /// `ids = None` deletes everything the store considers in scope.
    pub async fn delete(
        &self,
        ids: Option<Vec<String>>,
        collection_only: bool,
        executor: Option<&Executor>,
    ) -> BridgeResult<()> {
        self.call("delete", executor, move |store| {
            store.delete(ids, collection_only)
        })
        .await
    }

    /// Delete documents by identifier across all scopes.
    pub async fn delete_ids(
        &self,
        ids: Vec<String>,
        executor: Option<&Executor>,
    ) -> BridgeResult<()> {
        self.delete(Some(ids), false, executor).await
    }

    /// Delete every document.
    pub async fn delete_all(&self, executor: Option<&Executor>) -> BridgeResult<()> {
        self.delete(None, false, executor).await
    }

    /// Nearest documents to `embedding` with their scores, in store order.
    pub async fn similarity_search_with_score_by_vector(
        &self,
        embedding: Vec<f32>,
        k: usize,
        filter: Option<Filter>,
        executor: Option<&Executor>,
    ) -> BridgeResult<Vec<(Document, f32)>> {
        self.call(
            "similarity_search_with_score_by_vector",
            executor,
            move |store| {
                store.similarity_search_with_score_by_vector(&embedding, k, filter.as_ref())
            },
        )
        .await
    }

    /// [`similarity_search_with_score_by_vector`](Self::similarity_search_with_score_by_vector)
    /// taking [`SearchOptions`].
    pub async fn similarity_search(
        &self,
        embedding: Vec<f32>,
        options: SearchOptions,
        executor: Option<&Executor>,
    ) -> BridgeResult<Vec<(Document, f32)>> {
        self.similarity_search_with_score_by_vector(embedding, options.k, options.filter, executor)
            .await
    }

    /// Insert documents, returning their identifiers.
    pub async fn add_documents(
        &self,
        documents: Vec<Document>,
        ids: Option<Vec<String>>,
        options: AddOptions,
        executor: Option<&Executor>,
    ) -> BridgeResult<Vec<String>> {
        self.call("add_documents", executor, move |store| {
            store.add_documents(documents, ids, options)
        })
        .await
    }

    async fn call<T, F>(
        &self,
        operation: &'static str,
        executor: Option<&Executor>,
        f: F,
    ) -> BridgeResult<T>
    where
        F: FnOnce(&S) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let executor = self.resolver.resolve(executor);
        let store = Arc::clone(&self.store);
        submit::submit(executor, Some(&self.metrics), operation, move || f(&store)).await
    }
}

impl<S> std::fmt::Debug for AsyncVectorStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncVectorStore")
            .field("resolver", &self.resolver)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}
