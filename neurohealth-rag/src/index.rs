//! Embedding-ranked knowledge index.
//!
//! [`KnowledgeIndex`] keeps documents and their vectors as two parallel
//! sequences; a document's position is its join key. The index is built once
//! from a single batch embedding call and is read-only afterwards, so it can
//! be shared behind an `Arc` without locking.

use std::cmp::Ordering;

use tracing::{debug, error, info};

use crate::document::{KnowledgeDocument, RetrievedDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Compute cosine similarity between two vectors of equal length.
///
/// Returns exactly `0.0` if either vector has zero magnitude or contains
/// non-finite components that make the ratio undefined. The result is clamped
/// to `[-1, 1]` to absorb floating-point drift.
///
/// # Errors
///
/// Returns [`RagError::DimensionMismatch`] if the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::DimensionMismatch { expected: a.len(), actual: b.len() });
    }
    // Summed in f64: squares of f32 components can underflow or overflow.
    let norm_a = a.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| f64::from(x) * f64::from(y)).sum();
    let similarity = dot / (norm_a * norm_b);
    if similarity.is_nan() {
        return Ok(0.0);
    }
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// An immutable index of knowledge documents and their embeddings.
///
/// # Example
///
/// ```rust,ignore
/// use neurohealth_rag::{KnowledgeIndex, load_documents};
///
/// let documents = load_documents("data/knowledge_base.json")?;
/// let index = KnowledgeIndex::build(documents, &embedder).await?;
/// let hits = index.retrieve("I have a high fever", &embedder, 4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct KnowledgeIndex {
    documents: Vec<KnowledgeDocument>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl KnowledgeIndex {
    /// Embed every document (title and content, newline-joined) in one batch
    /// call and pair the results positionally.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MalformedCollection`] for an empty document list,
    /// the embedder's error if the batch call fails, and the errors of
    /// [`from_parts`](Self::from_parts) if the returned vectors do not line up.
    pub async fn build(
        documents: Vec<KnowledgeDocument>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(RagError::MalformedCollection(
                "cannot build an index without documents".into(),
            ));
        }

        let texts: Vec<String> = documents.iter().map(KnowledgeDocument::embedding_text).collect();
        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        debug!(provider = embedder.name(), batch_size = text_refs.len(), "embedding knowledge base");
        let vectors = embedder.embed_batch(&text_refs).await.map_err(|e| {
            error!(provider = embedder.name(), error = %e, "embedding failed during index build");
            e
        })?;

        let index = Self::from_parts(documents, vectors)?;
        info!(
            document_count = index.len(),
            dimensions = index.dimensions,
            "built knowledge index"
        );
        Ok(index)
    }

    /// Pair precomputed vectors with their documents.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorCountMismatch`] if the counts differ and
    /// [`RagError::DimensionMismatch`] if the vectors disagree in length.
    pub fn from_parts(documents: Vec<KnowledgeDocument>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if vectors.len() != documents.len() {
            error!(expected = documents.len(), actual = vectors.len(), "vector count mismatch");
            return Err(RagError::VectorCountMismatch {
                expected: documents.len(),
                actual: vectors.len(),
            });
        }

        let dimensions = vectors.first().map_or(0, Vec::len);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(RagError::DimensionMismatch { expected: dimensions, actual: bad.len() });
        }

        Ok(Self { documents, vectors, dimensions })
    }

    /// The indexed documents in load order.
    pub fn documents(&self) -> &[KnowledgeDocument] {
        &self.documents
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Dimensionality shared by every stored vector.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed `query` and return the `top_k` most similar documents.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidQuery`] for a blank query and
    /// [`RagError::InvalidTopK`] when `top_k == 0`, both before any embedding
    /// call. Embedder failures and [`RagError::DimensionMismatch`] propagate.
    pub async fn retrieve(
        &self,
        query: &str,
        embedder: &dyn EmbeddingProvider,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        if query.trim().is_empty() {
            return Err(RagError::InvalidQuery("query must not be empty".into()));
        }
        if top_k == 0 {
            return Err(RagError::InvalidTopK);
        }

        let query_vector = embedder.embed(query).await.map_err(|e| {
            error!(provider = embedder.name(), error = %e, "embedding failed during retrieval");
            e
        })?;

        let results = self.rank(&query_vector, top_k)?;
        info!(top_k, result_count = results.len(), "retrieval completed");
        Ok(results)
    }

    /// Score every document against `query_vector` and keep the best `top_k`.
    ///
    /// Ordering is by descending score. The sort is stable, so exact ties keep
    /// load order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidTopK`] when `top_k == 0` and
    /// [`RagError::DimensionMismatch`] if `query_vector` does not match the
    /// index dimensionality.
    pub fn rank(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<RetrievedDocument>> {
        if top_k == 0 {
            return Err(RagError::InvalidTopK);
        }
        if query_vector.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query_vector.len(),
            });
        }

        let mut scored = self
            .documents
            .iter()
            .zip(&self.vectors)
            .map(|(document, vector)| {
                Ok(RetrievedDocument {
                    document: document.clone(),
                    score: cosine_similarity(vector, query_vector)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| descending(a.score, b.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

// NaN sinks to the bottom so the comparator stays a total order.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}
