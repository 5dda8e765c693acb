//! Recommendation orchestrator.
//!
//! The [`HealthEngine`] composes deterministic triage, knowledge retrieval,
//! and grounded generation into one [`Recommendation`] per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use neurohealth_engine::{HealthEngine, HealthRequest};
//!
//! let engine = HealthEngine::builder()
//!     .knowledge_index(Arc::new(index))
//!     .embedding_provider(Arc::new(embedder))
//!     .generator(Arc::new(generator))
//!     .feedback_sink(Arc::new(store))
//!     .build()?;
//!
//! let recommendation = engine.recommend(&HealthRequest::new("I have a mild cough")?).await?;
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use neurohealth_rag::{EmbeddingProvider, KnowledgeIndex};
use neurohealth_triage::{Guidance, UrgencyTier, assess_urgency};
use tracing::{error, info, warn};

use crate::error::{EngineError, Result};
use crate::feedback::FeedbackSink;
use crate::generation::TextGenerator;
use crate::model::{HealthRequest, Recommendation, RecommendationFeedback};
use crate::prompt::{build_reasoning_prompt, system_instruction};

/// Number of knowledge documents retrieved for each non-emergency request.
pub const RETRIEVAL_TOP_K: usize = 4;

/// Fixed assistant message for the emergency path.
pub const EMERGENCY_MESSAGE: &str =
    "Your symptoms may indicate a medical emergency. Please seek immediate emergency care now.";

/// The recommendation orchestrator.
///
/// The knowledge index is read-only after construction, so one engine can
/// serve concurrent requests without locking. Construct one via
/// [`HealthEngine::builder()`].
pub struct HealthEngine {
    knowledge_index: Arc<KnowledgeIndex>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn TextGenerator>,
    feedback_sink: Arc<dyn FeedbackSink>,
}

impl HealthEngine {
    /// Create a new [`HealthEngineBuilder`].
    pub fn builder() -> HealthEngineBuilder {
        HealthEngineBuilder::default()
    }

    pub fn knowledge_index(&self) -> &KnowledgeIndex {
        &self.knowledge_index
    }

    /// Produce exactly one recommendation for `request`.
    ///
    /// Emergency requests return immediately with [`EMERGENCY_MESSAGE`]; neither
    /// the embedder nor the generator is called on that path. Every other tier
    /// retrieves [`RETRIEVAL_TOP_K`] documents and makes one generation call.
    ///
    /// # Errors
    ///
    /// Retrieval failures surface as [`EngineError::Retrieval`] and generator
    /// failures as [`EngineError::GenerationError`]. No partial recommendation
    /// is returned.
    pub async fn recommend(&self, request: &HealthRequest) -> Result<Recommendation> {
        let report = request.symptom_report();
        let assessment = assess_urgency(report, request.user_input());
        let tier = assessment.tier;
        let guidance = Guidance::derive(tier, report, request.user_input());

        let reasoning_notes: Vec<String> = std::iter::once(format!("urgency:{tier}"))
            .chain(assessment.triggers.iter().map(|trigger| format!("trigger:{trigger}")))
            .collect();

        if tier == UrgencyTier::Emergency {
            warn!(triggers = ?reasoning_notes, "emergency tier, skipping retrieval and generation");
            return Ok(Recommendation {
                assistant_message: EMERGENCY_MESSAGE.to_string(),
                urgency: tier,
                appointment_recommendation: guidance.appointment,
                safety_instructions: guidance.safety_instructions,
                sources: Vec::new(),
                reasoning_notes,
                clarifying_questions: Vec::new(),
                needs_emergency: true,
            });
        }

        let retrieved = self
            .knowledge_index
            .retrieve(request.user_input(), self.embedding_provider.as_ref(), RETRIEVAL_TOP_K)
            .await
            .map_err(|e| {
                error!(error = %e, "retrieval failed");
                EngineError::from(e)
            })?;

        let prompt = build_reasoning_prompt(request, &retrieved, tier, &guidance)?;
        let assistant_message =
            self.generator.generate(&prompt, Some(system_instruction())).await.map_err(|e| {
                error!(generator = self.generator.name(), error = %e, "generation failed");
                e
            })?;

        let sources: Vec<String> = retrieved
            .iter()
            .map(|hit| hit.document.source.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        info!(urgency = %tier, source_count = sources.len(), "recommendation generated");

        Ok(Recommendation {
            assistant_message,
            urgency: tier,
            appointment_recommendation: guidance.appointment,
            safety_instructions: guidance.safety_instructions,
            sources,
            reasoning_notes,
            clarifying_questions: guidance.clarifying_questions,
            needs_emergency: false,
        })
    }

    /// Forward a feedback record to the configured sink.
    pub async fn record_feedback(&self, feedback: &RecommendationFeedback) -> Result<()> {
        self.feedback_sink.append(feedback).await.map_err(|e| {
            error!(conversation_id = feedback.conversation_id(), error = %e, "feedback not recorded");
            e
        })
    }
}

/// Builder for constructing a [`HealthEngine`].
///
/// All four collaborators are required.
#[derive(Default)]
pub struct HealthEngineBuilder {
    knowledge_index: Option<Arc<KnowledgeIndex>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn TextGenerator>>,
    feedback_sink: Option<Arc<dyn FeedbackSink>>,
}

impl HealthEngineBuilder {
    pub fn knowledge_index(mut self, index: Arc<KnowledgeIndex>) -> Self {
        self.knowledge_index = Some(index);
        self
    }

    /// Set the embedder used for query vectors. It must be the one the index was built with.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn feedback_sink(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback_sink = Some(sink);
        self
    }

    /// Build the [`HealthEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigError`] if any collaborator is missing.
    pub fn build(self) -> Result<HealthEngine> {
        let knowledge_index = self
            .knowledge_index
            .ok_or_else(|| EngineError::ConfigError("knowledge_index is required".to_string()))?;
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            EngineError::ConfigError("embedding_provider is required".to_string())
        })?;
        let generator = self
            .generator
            .ok_or_else(|| EngineError::ConfigError("generator is required".to_string()))?;
        let feedback_sink = self
            .feedback_sink
            .ok_or_else(|| EngineError::ConfigError("feedback_sink is required".to_string()))?;

        Ok(HealthEngine { knowledge_index, embedding_provider, generator, feedback_sink })
    }
}
