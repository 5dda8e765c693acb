//! OpenAI-compatible embedding provider (GitHub Models by default).
//!
//! This module is only available when the `openai` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default GitHub Models embeddings endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference/embeddings";

/// The default embedding model.
pub const DEFAULT_MODEL: &str = "openai/text-embedding-3-small";

const PROVIDER: &str = "OpenAI";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// An [`EmbeddingProvider`] for any endpoint speaking the OpenAI `/embeddings` API.
///
/// # Configuration
///
/// - `model` – defaults to `openai/text-embedding-3-small`.
/// - `endpoint` – defaults to GitHub Models; `/embeddings` is appended if missing.
/// - `api_key` – sent as a bearer token.
///
/// # Example
///
/// ```rust,ignore
/// use neurohealth_rag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::new("ghp_...")?;
/// let vectors = provider.embed_batch(&["fever", "cough"]).await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider with the given API key and default model/endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(config_error("API key must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| config_error(&format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, api_key, model: DEFAULT_MODEL.into(), endpoint: DEFAULT_ENDPOINT.into() })
    }

    /// Set the model name (e.g. `openai/text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(config_error("model must not be empty"));
        }
        self.model = model;
        Ok(self)
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self> {
        let endpoint = endpoint.as_ref().trim();
        if endpoint.is_empty() {
            return Err(config_error("endpoint must not be empty"));
        }
        self.endpoint = normalize_endpoint(endpoint);
        Ok(self)
    }

    /// The resolved endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn config_error(message: &str) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message: message.into() }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with("/embeddings") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/embeddings")
    }
}

// ── Embeddings API request/response types ──────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default = "missing_index")]
    index: i64,
    embedding: Vec<f32>,
}

fn missing_index() -> i64 {
    -1
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Order response entries by their `index` and check one vector per input.
fn into_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    if response.data.len() != expected {
        return Err(RagError::EmbeddingError {
            provider: PROVIDER.into(),
            message: format!(
                "payload has {} vectors for {expected} inputs",
                response.data.len()
            ),
        });
    }
    let mut data = response.data;
    data.sort_by_key(|item| item.index);
    Ok(data.into_iter().map(|item| item.embedding).collect())
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(config_error("texts must not be empty"));
        }
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(config_error("every text must be non-empty"));
        }

        debug!(provider = PROVIDER, batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbeddingRequest { model: &self.model, input: texts };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                RagError::EmbeddingError {
                    provider: PROVIDER.into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::EmbeddingError {
                provider: PROVIDER.into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagError::EmbeddingError {
                provider: PROVIDER.into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        into_vectors(embedding_response, texts.len())
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_embeddings_suffix_once() {
        assert_eq!(
            normalize_endpoint("https://models.github.ai/inference/"),
            "https://models.github.ai/inference/embeddings"
        );
        assert_eq!(
            normalize_endpoint("https://api.openai.com/v1/embeddings"),
            "https://api.openai.com/v1/embeddings"
        );
    }

    #[test]
    fn orders_vectors_by_response_index() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]}"#,
        )
        .unwrap();
        let vectors = into_vectors(response, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn rejects_short_payload() {
        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();
        assert!(matches!(into_vectors(response, 2), Err(RagError::EmbeddingError { .. })));
    }

    #[test]
    fn rejects_blank_api_key() {
        assert!(OpenAIEmbeddingProvider::new("  ").is_err());
    }

    #[tokio::test]
    async fn rejects_blank_texts_before_sending() {
        let provider = OpenAIEmbeddingProvider::new("token").unwrap();
        assert!(provider.embed_batch(&[]).await.is_err());
        assert!(provider.embed_batch(&["fever", " "]).await.is_err());
    }
}
