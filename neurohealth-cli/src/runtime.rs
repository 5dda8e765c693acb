use std::sync::Arc;

use anyhow::{Context, Result};
use neurohealth_engine::{GeminiGenerator, HealthEngine, JsonlFeedbackStore, Settings};
use neurohealth_rag::{KnowledgeIndex, OpenAIEmbeddingProvider, load_documents};
use tracing::info;

/// Wire the production collaborators described by `settings` into an engine.
///
/// Loads the knowledge base and embeds it once; this is the only startup
/// network call.
pub async fn build_engine(settings: &Settings) -> Result<HealthEngine> {
    let embedder = Arc::new(
        OpenAIEmbeddingProvider::new(&settings.embedding_token)?
            .with_model(&settings.embedding_model)?
            .with_endpoint(&settings.embedding_endpoint)?,
    );

    let documents = load_documents(&settings.knowledge_base_path).with_context(|| {
        format!("failed to load knowledge base '{}'", settings.knowledge_base_path.display())
    })?;
    let index = KnowledgeIndex::build(documents, embedder.as_ref())
        .await
        .context("failed to embed knowledge base")?;
    info!(documents = index.len(), dimensions = index.dimensions(), "knowledge index ready");

    let generator = GeminiGenerator::new(&settings.gemini_api_key)?.with_model(&settings.gemini_model)?;
    let feedback = JsonlFeedbackStore::new(&settings.feedback_path)?;

    Ok(HealthEngine::builder()
        .knowledge_index(Arc::new(index))
        .embedding_provider(embedder)
        .generator(Arc::new(generator))
        .feedback_sink(Arc::new(feedback))
        .build()?)
}
