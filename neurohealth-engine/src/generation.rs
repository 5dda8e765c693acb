//! Text-generation capability consumed by the engine.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that turns a prompt into prose.
///
/// Implementations own their transport, timeouts, and any retry policy; the
/// engine calls [`generate`](TextGenerator::generate) at most once per request.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a non-empty `prompt` with an optional system instruction.
    ///
    /// Fails with [`EngineError::GenerationError`](crate::EngineError::GenerationError)
    /// when the backend is unreachable or returns no usable text.
    async fn generate(&self, prompt: &str, system_instruction: Option<&str>) -> Result<String>;

    /// A short label used in logs and error messages.
    fn name(&self) -> &str {
        "generator"
    }
}
