//! Property tests for urgency precedence and clarifying-question bounds.

use neurohealth_triage::classifier::{EMERGENCY_KEYWORDS, URGENT_KEYWORDS};
use neurohealth_triage::{
    MAX_CLARIFYING_QUESTIONS, SymptomReport, Trigger, UrgencyTier, assess_urgency,
    clarifying_questions,
};
use proptest::prelude::*;
use proptest::sample::select;

fn arb_report() -> impl Strategy<Value = SymptomReport> {
    (
        proptest::collection::vec("[a-z ]{0,20}", 0..4),
        proptest::option::of(80.0f64..100.0),
        proptest::option::of(35.0f64..42.0),
        proptest::option::of(0i64..200),
        proptest::option::of(0i32..=10),
    )
        .prop_map(|(symptoms, spo2, temp, duration, pain)| {
            let mut builder =
                SymptomReport::builder().symptoms(symptoms).duration_hours(duration).pain_level(pain);
            if let Some(spo2) = spo2 {
                builder = builder.biometric("oxygen_saturation", spo2);
            }
            if let Some(temp) = temp {
                builder = builder.biometric("temperature_c", temp);
            }
            builder.build().unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any emergency keyword in the message wins over every other field.
    #[test]
    fn emergency_keyword_always_wins(
        report in arb_report(),
        keyword in select(EMERGENCY_KEYWORDS.to_vec()),
        urgent in select(URGENT_KEYWORDS.to_vec()),
        prefix in "[a-z ]{0,15}",
    ) {
        let message = format!("{prefix} {} and {urgent}", keyword.to_uppercase());
        let assessment = assess_urgency(&report, &message);
        prop_assert_eq!(assessment.tier, UrgencyTier::Emergency);
        prop_assert!(assessment.triggers.contains(&Trigger::Keyword(keyword)));
        prop_assert!(assessment.triggers.iter().all(|t| matches!(t, Trigger::Keyword(_))));
    }

    /// An emergency keyword given only as a symptom phrase also wins.
    #[test]
    fn emergency_symptom_phrase_always_wins(
        report in arb_report(),
        keyword in select(EMERGENCY_KEYWORDS.to_vec()),
    ) {
        let with_symptom = SymptomReport::new(
            report.symptoms().iter().cloned().chain([keyword.to_string()]).collect(),
            report.biometrics().clone(),
            report.duration_hours(),
            report.pain_level(),
        )
        .unwrap();
        prop_assert_eq!(assess_urgency(&with_symptom, "").tier, UrgencyTier::Emergency);
    }

    #[test]
    fn clarifying_questions_never_exceed_cap(report in arb_report(), message in ".{0,60}") {
        prop_assert!(clarifying_questions(&report, &message).len() <= MAX_CLARIFYING_QUESTIONS);
    }

    #[test]
    fn non_empty_message_is_never_self_care(report in arb_report(), message in "[a-z]{1,20}") {
        prop_assert!(assess_urgency(&report, &message).tier > UrgencyTier::SelfCare);
    }
}
