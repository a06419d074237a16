//! Document and argument types shared by the store and the bridge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form document metadata.
pub type Metadata = Map<String, Value>;

/// Metadata filter passed to similarity search.
///
/// The structure (e.g. `{"file_id": {"$eq": "id1"}}`) is interpreted only by
/// the store.
pub type Filter = Map<String, Value>;

/// Keyword options forwarded verbatim to [`VectorStore::add_documents`].
///
/// [`VectorStore::add_documents`]: super::VectorStore::add_documents
pub type AddOptions = Map<String, Value>;

/// A stored text document with its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The document text.
    pub page_content: String,

    /// Arbitrary metadata attached to the document.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
