//! Error types for the `neurohealth-engine` crate.

use neurohealth_rag::RagError;
use neurohealth_triage::ValidationError;
use thiserror::Error;

/// Errors that abort a recommendation, feedback, or configuration call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A symptom report or profile value was out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request-level check failed (blank message, bad rating, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Knowledge retrieval failed, including embedding-provider failures.
    #[error(transparent)]
    Retrieval(#[from] RagError),

    /// The text-generation collaborator failed or returned no usable text.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The feedback sink could not record or read feedback.
    #[error("Feedback error: {0}")]
    FeedbackError(String),

    /// Settings or engine construction failed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request context could not be rendered to JSON for the prompt.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// A convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
