//! Append-only feedback persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::{EngineError, Result};
use crate::model::RecommendationFeedback;

/// Somewhere to record user ratings of recommendations.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Persist one feedback record.
    async fn append(&self, feedback: &RecommendationFeedback) -> Result<()>;
}

/// A [`FeedbackSink`] writing one JSON object per line to a local file.
///
/// Appends are serialized through an internal lock so concurrent callers never
/// interleave partial lines.
#[derive(Debug)]
pub struct JsonlFeedbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlFeedbackStore {
    /// Create a store at `path`, creating missing parent directories.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                error!(path = %parent.display(), error = %e, "failed to create feedback directory");
                EngineError::FeedbackError(format!(
                    "failed to create directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        Ok(Self { path, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order. A missing file yields no records.
    ///
    /// Blank lines are skipped; a malformed line fails with its 1-based
    /// line number.
    pub async fn read_all(&self) -> Result<Vec<RecommendationFeedback>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(EngineError::FeedbackError(format!(
                    "failed to read '{}': {e}",
                    self.path.display()
                )));
            }
        };

        let mut records = Vec::new();
        for (offset, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| {
                EngineError::FeedbackError(format!(
                    "invalid feedback JSON at line {}: {e}",
                    offset + 1
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl FeedbackSink for JsonlFeedbackStore {
    async fn append(&self, feedback: &RecommendationFeedback) -> Result<()> {
        let mut line = serde_json::to_string(feedback)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                error!(path = %self.path.display(), error = %e, "failed to open feedback file");
                EngineError::FeedbackError(format!(
                    "failed to open '{}': {e}",
                    self.path.display()
                ))
            })?;
        file.write_all(line.as_bytes()).await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to write feedback");
            EngineError::FeedbackError(format!("failed to write '{}': {e}", self.path.display()))
        })?;
        file.flush()
            .await
            .map_err(|e| EngineError::FeedbackError(format!("failed to flush feedback: {e}")))?;

        debug!(conversation_id = feedback.conversation_id(), "feedback recorded");
        Ok(())
    }
}
