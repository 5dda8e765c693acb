//! Data types for knowledge documents and retrieval results.

use serde::{Deserialize, Serialize};

/// A validated reference document from the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeDocument {
    /// Identifier of the document within its collection.
    pub id: String,
    /// Short human-readable title.
    pub title: String,
    /// The body text used for grounding.
    pub content: String,
    /// Citation for the document (e.g. the publishing organisation).
    pub source: String,
    /// Free-form topic tags, trimmed and never empty.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl KnowledgeDocument {
    /// The text submitted to the embedder for this document: title, newline, content.
    pub fn embedding_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// A [`KnowledgeDocument`] paired with its cosine similarity to a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    /// The matched document.
    #[serde(flatten)]
    pub document: KnowledgeDocument,
    /// Cosine similarity in `[-1, 1]` (higher is more relevant).
    pub score: f32,
}
