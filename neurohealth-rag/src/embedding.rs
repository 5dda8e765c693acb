//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. Returned batches must be positionally aligned with the submitted
/// texts; the index trusts that order. The default [`embed`](EmbeddingProvider::embed)
/// submits a one-element batch.
///
/// # Example
///
/// ```rust,ignore
/// use neurohealth_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let vectors = provider.embed_batch(&["fever", "cough"]).await?;
/// assert_eq!(vectors.len(), 2);
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding vectors for a batch of non-empty texts, in order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vectors = self.embed_batch(&[text]).await?;
        vectors.into_iter().next().ok_or_else(|| crate::error::RagError::EmbeddingError {
            provider: self.name().to_string(),
            message: "provider returned no vector for a single text".to_string(),
        })
    }

    /// A short label used in logs and error messages.
    fn name(&self) -> &str {
        "embedding"
    }
}
