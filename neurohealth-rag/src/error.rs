//! Error types for the `neurohealth-rag` crate.

use thiserror::Error;

/// Errors that can occur while loading, indexing, or searching the knowledge base.
#[derive(Debug, Error)]
pub enum RagError {
    /// The top-level knowledge collection is empty or not a list.
    #[error("Malformed knowledge collection: {0}")]
    MalformedCollection(String),

    /// A single knowledge entry failed validation.
    #[error("Malformed knowledge document at entry {index}: {message}")]
    MalformedDocument {
        /// 1-based position of the entry in the source collection.
        index: usize,
        /// A description of the failure.
        message: String,
    },

    /// The embedder returned a different number of vectors than texts submitted.
    #[error("Embedding returned {actual} vectors for {expected} documents")]
    VectorCountMismatch {
        /// Number of documents submitted.
        expected: usize,
        /// Number of vectors returned.
        actual: usize,
    },

    /// Two vectors that must share a dimensionality do not.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the index.
        expected: usize,
        /// Dimensionality of the offending vector.
        actual: usize,
    },

    /// The retrieval query is blank.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The requested number of results is zero.
    #[error("top_k must be greater than zero")]
    InvalidTopK,

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The knowledge-base file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The knowledge-base file is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for knowledge-base operations.
pub type Result<T> = std::result::Result<T, RagError>;
