//! Validation errors for triage inputs.

use thiserror::Error;

/// An input rejected at construction time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Symptom duration was negative.
    #[error("duration_hours must be >= 0 when provided (got {0})")]
    NegativeDuration(i64),

    /// Pain level fell outside `0..=10`.
    #[error("pain_level must be in the [0, 10] range when provided (got {0})")]
    PainLevelOutOfRange(i32),

    /// Age was zero or negative.
    #[error("age must be a positive integer when provided (got {0})")]
    NonPositiveAge(i32),

    /// A `key=value` biometric entry could not be parsed.
    #[error("invalid biometric entry '{entry}': {reason}")]
    MalformedBiometric {
        /// The raw entry as supplied.
        entry: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Health literacy was not one of `basic`, `intermediate`, `advanced`.
    #[error("unknown health literacy level '{0}' (expected basic, intermediate, or advanced)")]
    UnknownHealthLiteracy(String),
}

/// Result type alias for triage validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
