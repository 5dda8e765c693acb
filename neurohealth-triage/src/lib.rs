//! # neurohealth-triage
//!
//! Deterministic urgency triage for NeuroHealth.
//!
//! - [`assess_urgency`] maps a [`SymptomReport`] and free-text message to an
//!   [`UrgencyTier`] with the [`Trigger`]s that explain it.
//! - [`Guidance::derive`] turns the tier into appointment routing, safety
//!   instructions, and up to three clarifying questions.
//!
//! ```rust
//! use neurohealth_triage::{Guidance, SymptomReport, UrgencyTier, assess_urgency};
//!
//! let report = SymptomReport::builder().symptom("mild cough").pain_level(Some(2)).build()?;
//! let assessment = assess_urgency(&report, "I have mild cough for one day");
//! assert_eq!(assessment.tier, UrgencyTier::Routine);
//!
//! let guidance = Guidance::derive(assessment.tier, &report, "I have mild cough for one day");
//! assert!(guidance.appointment.contains("primary care"));
//! # Ok::<(), neurohealth_triage::ValidationError>(())
//! ```

pub mod classifier;
pub mod error;
pub mod model;
pub mod policy;

pub use classifier::{Assessment, assess_urgency, normalize};
pub use error::{Result, ValidationError};
pub use model::{
    BiometricValue, HealthLiteracy, SymptomReport, SymptomReportBuilder, Trigger, UrgencyTier,
    UserProfile, UserProfileBuilder,
};
pub use policy::{
    Guidance, MAX_CLARIFYING_QUESTIONS, appointment_for, clarifying_questions, safety_instructions,
};
