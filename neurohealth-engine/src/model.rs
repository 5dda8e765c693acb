//! Request, response, and feedback types for the recommendation engine.

use neurohealth_triage::{SymptomReport, UrgencyTier, UserProfile};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One prior message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConversationTurnFields")]
pub struct ConversationTurn {
    role: Role,
    content: String,
}

#[derive(Deserialize)]
struct ConversationTurnFields {
    role: Role,
    content: String,
}

impl TryFrom<ConversationTurnFields> for ConversationTurn {
    type Error = EngineError;

    fn try_from(fields: ConversationTurnFields) -> Result<Self> {
        ConversationTurn::new(fields.role, fields.content)
    }
}

impl ConversationTurn {
    /// Create a turn, rejecting blank content.
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "conversation turn content must not be empty".into(),
            ));
        }
        Ok(Self { role, content })
    }

    pub fn user(content: impl Into<String>) -> Result<Self> {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self> {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A validated request for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HealthRequestFields")]
pub struct HealthRequest {
    user_input: String,
    user_profile: UserProfile,
    symptom_report: SymptomReport,
    history: Vec<ConversationTurn>,
}

#[derive(Deserialize)]
struct HealthRequestFields {
    user_input: String,
    #[serde(default)]
    user_profile: UserProfile,
    #[serde(default)]
    symptom_report: SymptomReport,
    #[serde(default)]
    history: Vec<ConversationTurn>,
}

impl TryFrom<HealthRequestFields> for HealthRequest {
    type Error = EngineError;

    fn try_from(fields: HealthRequestFields) -> Result<Self> {
        Ok(HealthRequest::new(fields.user_input)?
            .with_profile(fields.user_profile)
            .with_symptom_report(fields.symptom_report)
            .with_history(fields.history))
    }
}

impl HealthRequest {
    /// Create a request with a default profile, an empty report, and no history.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRequest`] if `user_input` is blank.
    pub fn new(user_input: impl Into<String>) -> Result<Self> {
        let user_input = user_input.into();
        if user_input.trim().is_empty() {
            return Err(EngineError::InvalidRequest("user_input must not be empty".into()));
        }
        Ok(Self {
            user_input,
            user_profile: UserProfile::default(),
            symptom_report: SymptomReport::default(),
            history: Vec::new(),
        })
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = profile;
        self
    }

    pub fn with_symptom_report(mut self, report: SymptomReport) -> Self {
        self.symptom_report = report;
        self
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn symptom_report(&self) -> &SymptomReport {
        &self.symptom_report
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }
}

/// The engine's answer to one [`HealthRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub assistant_message: String,
    pub urgency: UrgencyTier,
    pub appointment_recommendation: String,
    pub safety_instructions: Vec<String>,
    /// Deduplicated, alphabetically sorted citations of the retrieved documents.
    pub sources: Vec<String>,
    /// `urgency:<tier>` followed by one `trigger:<tag>` per trigger.
    pub reasoning_notes: Vec<String>,
    pub clarifying_questions: Vec<String>,
    pub needs_emergency: bool,
}

/// A user's rating of a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FeedbackFields")]
pub struct RecommendationFeedback {
    conversation_id: String,
    rating: i32,
    comment: String,
}

#[derive(Deserialize)]
struct FeedbackFields {
    conversation_id: String,
    rating: i32,
    #[serde(default)]
    comment: String,
}

impl TryFrom<FeedbackFields> for RecommendationFeedback {
    type Error = EngineError;

    fn try_from(fields: FeedbackFields) -> Result<Self> {
        RecommendationFeedback::new(fields.conversation_id, fields.rating, fields.comment)
    }
}

impl RecommendationFeedback {
    /// Create a feedback record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRequest`] for a blank conversation id or a
    /// rating outside `1..=5`.
    pub fn new(
        conversation_id: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
    ) -> Result<Self> {
        let conversation_id = conversation_id.into();
        if conversation_id.trim().is_empty() {
            return Err(EngineError::InvalidRequest("conversation_id must not be empty".into()));
        }
        if !(1..=5).contains(&rating) {
            return Err(EngineError::InvalidRequest(format!(
                "rating must be in the [1, 5] range (got {rating})"
            )));
        }
        Ok(Self { conversation_id, rating, comment: comment.into() })
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}
