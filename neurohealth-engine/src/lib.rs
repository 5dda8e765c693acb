//! # neurohealth-engine
//!
//! Recommendation orchestration for NeuroHealth.
//!
//! A [`HealthEngine`] turns one [`HealthRequest`] into one [`Recommendation`]:
//!
//! 1. deterministic urgency triage and guidance from `neurohealth-triage`
//! 2. an early return for emergencies, with no network calls
//! 3. knowledge retrieval from a `neurohealth-rag` [`KnowledgeIndex`](neurohealth_rag::KnowledgeIndex)
//! 4. one grounded generation call through a [`TextGenerator`]
//!
//! Feedback is recorded separately through a [`FeedbackSink`].
//!
//! ## Features
//!
//! - `gemini` (default): [`GeminiGenerator`] backed by the Gemini REST API

pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod model;
pub mod prompt;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use config::Settings;
pub use engine::{EMERGENCY_MESSAGE, HealthEngine, HealthEngineBuilder, RETRIEVAL_TOP_K};
pub use error::{EngineError, Result};
pub use feedback::{FeedbackSink, JsonlFeedbackStore};
pub use generation::TextGenerator;
pub use model::{ConversationTurn, HealthRequest, Recommendation, RecommendationFeedback, Role};
pub use prompt::{build_reasoning_prompt, system_instruction};

#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;
