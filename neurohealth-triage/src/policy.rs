//! Guidance derived from an urgency tier: appointment routing, safety
//! instructions, and clarifying questions.

use crate::classifier::normalize;
use crate::model::{SymptomReport, UrgencyTier};

/// Upper bound on clarifying questions returned per request.
pub const MAX_CLARIFYING_QUESTIONS: usize = 3;

const DISCLAIMER: &str = "This assistant provides educational guidance and does not replace \
                          professional medical diagnosis.";

/// Fixed appointment recommendation for a tier.
pub fn appointment_for(tier: UrgencyTier) -> &'static str {
    match tier {
        UrgencyTier::Emergency => {
            "Go to the nearest emergency department now or call local emergency services."
        }
        UrgencyTier::Urgent => "Book a same-day urgent care or telemedicine appointment.",
        UrgencyTier::Routine => "Schedule a primary care appointment within 2-7 days.",
        UrgencyTier::SelfCare => {
            "Self-care is reasonable; monitor symptoms and schedule routine care if symptoms persist."
        }
    }
}

/// The disclaimer followed by two tier-specific escalation lines.
pub fn safety_instructions(tier: UrgencyTier) -> Vec<String> {
    let escalation: [&str; 2] = match tier {
        UrgencyTier::Emergency => [
            "Seek emergency care immediately.",
            "Do not delay care while waiting for additional online advice.",
        ],
        UrgencyTier::Urgent => [
            "Seek same-day clinical evaluation.",
            "Escalate to emergency care if breathing, consciousness, or severe pain worsens.",
        ],
        UrgencyTier::Routine => [
            "Track symptom progression and schedule a clinician follow-up.",
            "Escalate care if red-flag symptoms emerge.",
        ],
        UrgencyTier::SelfCare => [
            "Continue monitoring symptoms and hydration/rest routines.",
            "Seek medical care if symptoms worsen or fail to improve.",
        ],
    };
    std::iter::once(DISCLAIMER).chain(escalation).map(String::from).collect()
}

/// Follow-up questions for information the report is missing.
///
/// Conditions are checked in a fixed order against the normalized free text
/// and the first [`MAX_CLARIFYING_QUESTIONS`] that apply are kept.
pub fn clarifying_questions(report: &SymptomReport, user_input: &str) -> Vec<String> {
    let text = normalize(user_input);
    let candidates = [
        (report.duration_hours().is_none(), "How long have these symptoms been present?"),
        (
            report.pain_level().is_none() && text.contains("pain"),
            "On a 0-10 scale, what is your pain level right now?",
        ),
        (
            text.contains("fever") && !report.biometrics().contains_key("temperature_c"),
            "Do you have a measured temperature in Celsius?",
        ),
        (
            text.contains("cough") && !text.contains("shortness of breath"),
            "Is the cough dry or productive, and is breathing comfortable at rest?",
        ),
    ];

    candidates
        .into_iter()
        .filter_map(|(applies, question)| applies.then(|| question.to_string()))
        .take(MAX_CLARIFYING_QUESTIONS)
        .collect()
}

/// Everything the policy derives for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Guidance {
    pub appointment: String,
    pub safety_instructions: Vec<String>,
    pub clarifying_questions: Vec<String>,
}

impl Guidance {
    /// Apply all three policy mappings.
    pub fn derive(tier: UrgencyTier, report: &SymptomReport, user_input: &str) -> Self {
        Self {
            appointment: appointment_for(tier).to_string(),
            safety_instructions: safety_instructions(tier),
            clarifying_questions: clarifying_questions(report, user_input),
        }
    }
}
