//! Runtime settings resolved from environment variables.

use std::path::PathBuf;

use crate::error::{EngineError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai/text-embedding-3-small";
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://models.github.ai/inference/embeddings";
pub const DEFAULT_KB_PATH: &str = "data/knowledge_base.json";
pub const DEFAULT_FEEDBACK_PATH: &str = "data/feedback.jsonl";

const EMBEDDING_TOKEN_VARS: [&str; 3] = ["GITHUB_TOKEN", "GITHUB_MODELS_TOKEN", "OPENAI_API_KEY"];
const EMBEDDING_MODEL_VARS: [&str; 2] = ["GITHUB_EMBEDDING_MODEL", "OPENAI_EMBEDDING_MODEL"];

/// Credentials, model names, and file locations for a NeuroHealth runtime.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub gemini_api_key: String,
    pub embedding_token: String,
    pub gemini_model: String,
    pub embedding_model: String,
    pub embedding_endpoint: String,
    pub knowledge_base_path: PathBuf,
    pub feedback_path: PathBuf,
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &"<redacted>")
            .field("embedding_token", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_endpoint", &self.embedding_endpoint)
            .field("knowledge_base_path", &self.knowledge_base_path)
            .field("feedback_path", &self.feedback_path)
            .finish()
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup`, which returns a variable's raw value if set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigError`] when a required credential is
    /// missing or when an optional variable is set to a blank value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).map(|value| value.trim().to_string());

        let gemini_api_key = get("GEMINI_API_KEY").filter(|v| !v.is_empty()).ok_or_else(|| {
            EngineError::ConfigError("GEMINI_API_KEY is required (set env var or .env entry)".into())
        })?;

        let embedding_token = EMBEDDING_TOKEN_VARS
            .iter()
            .filter_map(|&name| get(name))
            .find(|v| !v.is_empty())
            .ok_or_else(|| {
                EngineError::ConfigError(
                    "GITHUB_TOKEN is required for GitHub Models embeddings (set env var or .env entry)"
                        .into(),
                )
            })?;

        let with_default = |names: &[&str], default: &str| -> Result<String> {
            match names.iter().find_map(|&name| get(name).map(|value| (name, value))) {
                Some((name, value)) if value.is_empty() => {
                    Err(EngineError::ConfigError(format!("{name} must not be empty")))
                }
                Some((_, value)) => Ok(value),
                None => Ok(default.to_string()),
            }
        };

        Ok(Self {
            gemini_api_key,
            embedding_token,
            gemini_model: with_default(&["GEMINI_MODEL"], DEFAULT_GEMINI_MODEL)?,
            embedding_model: with_default(&EMBEDDING_MODEL_VARS, DEFAULT_EMBEDDING_MODEL)?,
            embedding_endpoint: with_default(
                &["GITHUB_MODELS_EMBEDDING_ENDPOINT"],
                DEFAULT_EMBEDDING_ENDPOINT,
            )?,
            knowledge_base_path: with_default(&["NEUROHEALTH_KB_PATH"], DEFAULT_KB_PATH)?.into(),
            feedback_path: with_default(&["NEUROHEALTH_FEEDBACK_PATH"], DEFAULT_FEEDBACK_PATH)?
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn applies_defaults() {
        let settings = settings(&[("GEMINI_API_KEY", " g-key "), ("GITHUB_TOKEN", "gh")]).unwrap();
        assert_eq!(settings.gemini_api_key, "g-key");
        assert_eq!(settings.embedding_token, "gh");
        assert_eq!(settings.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(settings.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(settings.embedding_endpoint, DEFAULT_EMBEDDING_ENDPOINT);
        assert_eq!(settings.knowledge_base_path, PathBuf::from(DEFAULT_KB_PATH));
        assert_eq!(settings.feedback_path, PathBuf::from(DEFAULT_FEEDBACK_PATH));
    }

    #[test]
    fn requires_credentials() {
        let err = settings(&[("GITHUB_TOKEN", "gh")]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let err = settings(&[("GEMINI_API_KEY", "g"), ("GITHUB_TOKEN", "  ")]).unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn token_falls_back_through_aliases() {
        let settings = settings(&[
            ("GEMINI_API_KEY", "g"),
            ("GITHUB_TOKEN", ""),
            ("OPENAI_API_KEY", "sk-fallback"),
        ])
        .unwrap();
        assert_eq!(settings.embedding_token, "sk-fallback");
    }

    #[test]
    fn embedding_model_prefers_github_variable() {
        let settings = settings(&[
            ("GEMINI_API_KEY", "g"),
            ("GITHUB_TOKEN", "gh"),
            ("GITHUB_EMBEDDING_MODEL", "openai/text-embedding-3-large"),
            ("OPENAI_EMBEDDING_MODEL", "text-embedding-ada-002"),
        ])
        .unwrap();
        assert_eq!(settings.embedding_model, "openai/text-embedding-3-large");
    }

    #[test]
    fn rejects_blank_overrides() {
        let err = settings(&[("GEMINI_API_KEY", "g"), ("GITHUB_TOKEN", "gh"), ("GEMINI_MODEL", " ")])
            .unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(ref m) if m.contains("GEMINI_MODEL")));
    }

    #[test]
    fn debug_redacts_secrets() {
        let settings = settings(&[("GEMINI_API_KEY", "secret-g"), ("GITHUB_TOKEN", "secret-gh")])
            .unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret"));
    }
}
