//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use vecbridge::executor::{Executor, ExecutorProvider};
use vecbridge::store::{AddOptions, Document, Filter, StoreError, StoreResult, VectorStore};

/// One recorded call into the store, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetAllIds,
    GetFilteredIds(Vec<String>),
    GetDocumentsByIds(Vec<String>),
    Delete(Option<Vec<String>>, bool),
    SimilaritySearch(Vec<f32>, usize, Option<Filter>),
    AddDocuments(Vec<Document>, Option<Vec<String>>, AddOptions),
}

/// Store double that records every call and returns canned values.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    threads: Mutex<Vec<Option<String>>>,
    failure: Mutex<Option<StoreError>>,
    pub all_ids: Vec<String>,
    pub filtered_ids: Vec<String>,
    pub documents: Vec<Document>,
    pub hits: Vec<(Document, f32)>,
    pub added_ids: Vec<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all_ids(mut self, ids: &[&str]) -> Self {
        self.all_ids = strings(ids);
        self
    }

    pub fn with_filtered_ids(mut self, ids: &[&str]) -> Self {
        self.filtered_ids = strings(ids);
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_hits(mut self, hits: Vec<(Document, f32)>) -> Self {
        self.hits = hits;
        self
    }

    pub fn with_added_ids(mut self, ids: &[&str]) -> Self {
        self.added_ids = strings(ids);
        self
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: StoreError) {
        *self.failure.lock() = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Names of the threads each call ran on.
    pub fn thread_names(&self) -> Vec<Option<String>> {
        self.threads.lock().clone()
    }

    fn record(&self, call: Call) -> StoreResult<()> {
        self.calls.lock().push(call);
        self.threads
            .lock()
            .push(std::thread::current().name().map(str::to_string));
        match self.failure.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl VectorStore for RecordingStore {
    fn get_all_ids(&self) -> StoreResult<Vec<String>> {
        self.record(Call::GetAllIds)?;
        Ok(self.all_ids.clone())
    }

    fn get_filtered_ids(&self, ids: &[String]) -> StoreResult<Vec<String>> {
        self.record(Call::GetFilteredIds(ids.to_vec()))?;
        Ok(self.filtered_ids.clone())
    }

    fn get_documents_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Document>> {
        self.record(Call::GetDocumentsByIds(ids.to_vec()))?;
        Ok(self.documents.clone())
    }

    fn delete(&self, ids: Option<Vec<String>>, collection_only: bool) -> StoreResult<()> {
        self.record(Call::Delete(ids, collection_only))
    }

    fn similarity_search_with_score_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&Filter>,
    ) -> StoreResult<Vec<(Document, f32)>> {
        self.record(Call::SimilaritySearch(embedding.to_vec(), k, filter.cloned()))?;
        Ok(self.hits.clone())
    }

    fn add_documents(
        &self,
        documents: Vec<Document>,
        ids: Option<Vec<String>>,
        options: AddOptions,
    ) -> StoreResult<Vec<String>> {
        self.record(Call::AddDocuments(documents, ids, options))?;
        Ok(self.added_ids.clone())
    }
}

/// Provider that counts how often discovery runs.
pub struct CountingProvider {
    executor: Executor,
    calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn new(executor: Executor) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                executor,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl ExecutorProvider for CountingProvider {
    fn discover(&self) -> Option<Executor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(self.executor.clone())
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
