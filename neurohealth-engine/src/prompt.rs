//! Prompt assembly for grounded generation.

use neurohealth_rag::RetrievedDocument;
use neurohealth_triage::{Guidance, UrgencyTier};

use crate::error::Result;
use crate::model::HealthRequest;

const SYSTEM_INSTRUCTION: &str = "You are NeuroHealth, a clinically cautious AI health assistant. \
Ground recommendations in supplied medical snippets, adapt language to user literacy, \
include nutrition and planning advice only when contextually relevant, and avoid definitive diagnoses. \
Always prioritize patient safety and include explicit escalation cues.";

const RESPONSE_STRUCTURE: &str = "Produce a concise, user-friendly response with this structure:
1) Personalized guidance summary
2) Nutrition/planning advice relevant to profile + symptoms
3) Appointment recommendation with urgency rationale
4) Safety instructions and escalation cues
5) Optional clarifying questions (only if truly needed)";

/// The persona sent as the generator's system instruction.
pub fn system_instruction() -> &'static str {
    SYSTEM_INSTRUCTION
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|item| format!("- {item}")).collect::<Vec<_>>().join("\n")
}

/// Render the reasoning prompt for one non-emergency request.
///
/// The profile, symptom report, and history are embedded as pretty-printed
/// JSON; each retrieved document becomes a `- [source] title: content` line.
pub fn build_reasoning_prompt(
    request: &HealthRequest,
    retrieved: &[RetrievedDocument],
    tier: UrgencyTier,
    guidance: &Guidance,
) -> Result<String> {
    let profile_json = serde_json::to_string_pretty(request.user_profile())?;
    let symptom_json = serde_json::to_string_pretty(request.symptom_report())?;
    let history_json = serde_json::to_string_pretty(request.history())?;

    let knowledge = retrieved
        .iter()
        .map(|hit| {
            let doc = &hit.document;
            format!("- [{}] {}: {}", doc.source, doc.title, doc.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let clarifications = if guidance.clarifying_questions.is_empty() {
        "- None".to_string()
    } else {
        bullet_list(&guidance.clarifying_questions)
    };

    let prompt = format!(
        "User profile:\n{profile_json}\n\n\
         Symptom report:\n{symptom_json}\n\n\
         Conversation history:\n{history_json}\n\n\
         Latest user message:\n{user_input}\n\n\
         Retrieved validated health knowledge:\n{knowledge}\n\n\
         Current urgency label: {tier}\n\
         Proposed appointment recommendation: {appointment}\n\n\
         Safety instructions to include:\n{safety}\n\n\
         Clarifying questions to ask if needed:\n{clarifications}\n\n\
         {RESPONSE_STRUCTURE}",
        user_input = request.user_input(),
        appointment = guidance.appointment,
        safety = bullet_list(&guidance.safety_instructions),
    );
    Ok(prompt.trim().to_string())
}

#[cfg(test)]
mod tests {
    use neurohealth_rag::KnowledgeDocument;
    use neurohealth_triage::{SymptomReport, UserProfile};

    use super::*;
    use crate::model::ConversationTurn;

    fn retrieved(source: &str, title: &str, content: &str) -> RetrievedDocument {
        RetrievedDocument {
            document: KnowledgeDocument {
                id: title.to_lowercase(),
                title: title.into(),
                content: content.into(),
                source: source.into(),
                tags: vec![],
            },
            score: 0.5,
        }
    }

    fn request() -> HealthRequest {
        HealthRequest::new("I have a mild cough")
            .unwrap()
            .with_profile(UserProfile::builder().age(Some(34)).build().unwrap())
            .with_symptom_report(SymptomReport::builder().symptom("cough").build().unwrap())
            .with_history(vec![ConversationTurn::user("hello").unwrap()])
    }

    #[test]
    fn renders_sections_in_order() {
        let request = request();
        let guidance = Guidance::derive(UrgencyTier::Routine, request.symptom_report(), "cough");
        let prompt = build_reasoning_prompt(
            &request,
            &[retrieved("CDC", "Cough", "Rest and fluids.")],
            UrgencyTier::Routine,
            &guidance,
        )
        .unwrap();

        let order = [
            "User profile:",
            "Symptom report:",
            "Conversation history:",
            "Latest user message:\nI have a mild cough",
            "Retrieved validated health knowledge:\n- [CDC] Cough: Rest and fluids.",
            "Current urgency label: routine",
            "Proposed appointment recommendation:",
            "Safety instructions to include:\n- ",
            "Clarifying questions to ask if needed:",
            "5) Optional clarifying questions",
        ];
        let mut cursor = 0;
        for section in order {
            let found = prompt[cursor..].find(section);
            assert!(found.is_some(), "missing or out of order: {section}");
            cursor += found.unwrap();
        }
        assert!(prompt.contains("\"age\": 34"));
        assert!(!prompt.starts_with(char::is_whitespace));
    }

    #[test]
    fn marks_absent_clarifying_questions() {
        let request = request();
        let guidance = Guidance {
            appointment: "Monitor.".into(),
            safety_instructions: vec!["Stay safe.".into()],
            clarifying_questions: vec![],
        };
        let prompt =
            build_reasoning_prompt(&request, &[], UrgencyTier::SelfCare, &guidance).unwrap();
        assert!(prompt.contains("Clarifying questions to ask if needed:\n- None"));
    }

    #[test]
    fn persona_mentions_safety() {
        assert!(system_instruction().starts_with("You are NeuroHealth"));
        assert!(system_instruction().contains("escalation cues"));
    }
}
