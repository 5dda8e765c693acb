//! Gemini text generator using the `generateContent` REST endpoint.
//!
//! This module is only available when the `gemini` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{EngineError, Result};
use crate::generation::TextGenerator;

/// The default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const PROVIDER: &str = "Gemini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.9;

/// A [`TextGenerator`] backed by the Gemini API.
///
/// # Example
///
/// ```rust,ignore
/// use neurohealth_engine::gemini::GeminiGenerator;
///
/// let generator = GeminiGenerator::new("your-api-key")?.with_model("gemini-2.0-flash")?;
/// let text = generator.generate("Summarise fever self-care.", None).await?;
/// ```
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a generator for the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EngineError::ConfigError("Gemini API key must not be empty".into()));
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            EngineError::ConfigError(format!("failed to create Gemini HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(EngineError::ConfigError("Gemini model must not be empty".into()));
        }
        self.model = model;
        Ok(self)
    }

    /// Override the API base URL (e.g. for a proxy).
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(EngineError::ConfigError("Gemini base URL must not be empty".into()));
        }
        self.base_url = base_url.to_string();
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn generation_error(message: impl Into<String>) -> EngineError {
    EngineError::GenerationError { provider: PROVIDER.into(), message: message.into() }
}

// ── generateContent request/response types ─────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Join the non-blank text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| generation_error("response did not include candidates"))?;
    let content =
        candidate.content.ok_or_else(|| generation_error("response included no content"))?;
    if content.parts.is_empty() {
        return Err(generation_error("response did not include text parts"));
    }

    let texts: Vec<String> = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if texts.is_empty() {
        return Err(generation_error("response did not include textual output"));
    }
    Ok(texts.join("\n"))
}

// ── TextGenerator implementation ───────────────────────────────────

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str, system_instruction: Option<&str>) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(generation_error("prompt must not be empty"));
        }

        debug!(provider = PROVIDER, model = %self.model, prompt_len = prompt.len(), "generating");

        let body = GenerateRequest {
            contents: [Content { role: "user", parts: [TextPart { text: prompt }] }],
            generation_config: GenerationConfig { temperature: TEMPERATURE, top_p: TOP_P },
            system_instruction: system_instruction
                .filter(|s| !s.trim().is_empty())
                .map(|text| SystemInstruction { parts: [TextPart { text }] }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                generation_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(provider = PROVIDER, %status, "API error");
            return Err(generation_error(format!("API returned {status}: {detail}")));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            generation_error(format!("failed to parse response: {e}"))
        })?;

        extract_text(parsed)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_non_blank_parts_of_first_candidate() {
        let response = parse(
            r#"{"candidates": [
                {"content": {"parts": [{"text": " Rest well. "}, {"text": "  "}, {"text": "Hydrate."}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        );
        assert_eq!(extract_text(response).unwrap(), "Rest well.\nHydrate.");
    }

    #[test]
    fn rejects_responses_without_text() {
        for json in [
            r#"{}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}, {}]}}]}"#,
        ] {
            assert!(matches!(
                extract_text(parse(json)),
                Err(EngineError::GenerationError { .. })
            ));
        }
    }

    #[test]
    fn serializes_system_instruction_only_when_present() {
        let body = GenerateRequest {
            contents: [Content { role: "user", parts: [TextPart { text: "hi" }] }],
            generation_config: GenerationConfig { temperature: TEMPERATURE, top_p: TOP_P },
            system_instruction: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("system_instruction").is_none());
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert!(value["generationConfig"].get("topP").is_some());
    }

    #[test]
    fn builds_endpoint_from_model() {
        let generator = GeminiGenerator::new("key")
            .unwrap()
            .with_model("gemini-2.5-flash")
            .unwrap()
            .with_base_url("http://localhost:8080/v1beta/")
            .unwrap();
        assert_eq!(
            generator.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn rejects_blank_prompt_before_sending() {
        let generator = GeminiGenerator::new("key").unwrap();
        let err = generator.generate("  ", None).await.unwrap_err();
        assert!(matches!(err, EngineError::GenerationError { .. }));
    }
}
