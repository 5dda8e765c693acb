//! Urgency classification.
//!
//! Rules run top to bottom and the first one that fires decides the tier, so
//! a single emergency signal always wins over any number of lower-severity
//! signals.

use tracing::debug;

use crate::model::{SymptomReport, Trigger, UrgencyTier};

/// Phrases that escalate straight to [`UrgencyTier::Emergency`].
pub const EMERGENCY_KEYWORDS: [&str; 10] = [
    "chest pain",
    "shortness of breath",
    "severe bleeding",
    "stroke",
    "one-sided weakness",
    "slurred speech",
    "loss of consciousness",
    "suicidal",
    "anaphylaxis",
    "seizure",
];

/// Phrases that escalate to [`UrgencyTier::Urgent`].
pub const URGENT_KEYWORDS: [&str; 8] = [
    "high fever",
    "persistent vomiting",
    "dehydration",
    "wheezing",
    "rapid heartbeat",
    "severe headache",
    "infection",
    "painful urination",
];

/// SpO2 percentage below which the reading is an emergency.
pub const LOW_OXYGEN_SATURATION: f64 = 92.0;
/// Body temperature in °C at or above which the reading is urgent.
pub const HIGH_FEVER_CELSIUS: f64 = 39.0;
/// Pain level at or above which the report is urgent.
pub const SEVERE_PAIN_LEVEL: i32 = 7;

/// Classification outcome: the tier plus the triggers that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub tier: UrgencyTier,
    pub triggers: Vec<Trigger>,
}

impl Assessment {
    fn new(tier: UrgencyTier, triggers: Vec<Trigger>) -> Self {
        Self { tier, triggers }
    }
}

/// Lower-case `text` and collapse every whitespace run to a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

struct Signals<'a> {
    text: String,
    report: &'a SymptomReport,
    user_input: &'a str,
}

type Rule = fn(&Signals<'_>) -> Option<Assessment>;

const RULES: [Rule; 6] = [
    emergency_keywords,
    low_oxygen_saturation,
    high_fever,
    severe_pain,
    urgent_keywords,
    symptoms_present,
];

/// Classify a symptom report and free-text message into an urgency tier.
///
/// The free text and every symptom phrase are joined and normalized before
/// keyword matching. Biometrics that are absent or not numeric skip their rule.
pub fn assess_urgency(report: &SymptomReport, user_input: &str) -> Assessment {
    let combined = std::iter::once(user_input)
        .chain(report.symptoms().iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let signals = Signals { text: normalize(&combined), report, user_input };

    let assessment = RULES
        .iter()
        .find_map(|rule| rule(&signals))
        .unwrap_or_else(|| Assessment::new(UrgencyTier::SelfCare, vec![Trigger::NoRiskSignal]));

    debug!(tier = %assessment.tier, trigger_count = assessment.triggers.len(), "assessed urgency");
    assessment
}

fn keyword_hits(text: &str, keywords: &[&'static str]) -> Vec<Trigger> {
    keywords.iter().filter(|k| text.contains(**k)).map(|k| Trigger::Keyword(*k)).collect()
}

fn emergency_keywords(signals: &Signals<'_>) -> Option<Assessment> {
    let hits = keyword_hits(&signals.text, &EMERGENCY_KEYWORDS);
    (!hits.is_empty()).then(|| Assessment::new(UrgencyTier::Emergency, hits))
}

fn low_oxygen_saturation(signals: &Signals<'_>) -> Option<Assessment> {
    signals
        .report
        .numeric_biometric("oxygen_saturation")
        .filter(|spo2| *spo2 < LOW_OXYGEN_SATURATION)
        .map(|_| Assessment::new(UrgencyTier::Emergency, vec![Trigger::LowOxygenSaturation]))
}

fn high_fever(signals: &Signals<'_>) -> Option<Assessment> {
    signals
        .report
        .numeric_biometric("temperature_c")
        .filter(|celsius| *celsius >= HIGH_FEVER_CELSIUS)
        .map(|_| Assessment::new(UrgencyTier::Urgent, vec![Trigger::HighFever]))
}

fn severe_pain(signals: &Signals<'_>) -> Option<Assessment> {
    signals
        .report
        .pain_level()
        .filter(|level| *level >= SEVERE_PAIN_LEVEL)
        .map(|_| Assessment::new(UrgencyTier::Urgent, vec![Trigger::SeverePain]))
}

fn urgent_keywords(signals: &Signals<'_>) -> Option<Assessment> {
    let hits = keyword_hits(&signals.text, &URGENT_KEYWORDS);
    (!hits.is_empty()).then(|| Assessment::new(UrgencyTier::Urgent, hits))
}

fn symptoms_present(signals: &Signals<'_>) -> Option<Assessment> {
    let present = !signals.report.symptoms().is_empty() || !signals.user_input.trim().is_empty();
    present.then(|| Assessment::new(UrgencyTier::Routine, vec![Trigger::SymptomsPresent]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_for_chest_pain() {
        let report = SymptomReport::builder()
            .symptoms(["chest pain", "shortness of breath"])
            .pain_level(Some(9))
            .build()
            .unwrap();
        let assessment = assess_urgency(&report, "I have chest pain and feel breathless");
        assert_eq!(assessment.tier, UrgencyTier::Emergency);
        assert!(assessment.triggers.contains(&Trigger::Keyword("chest pain")));
        assert!(assessment.triggers.contains(&Trigger::Keyword("shortness of breath")));
    }

    #[test]
    fn urgent_for_high_fever() {
        let report = SymptomReport::builder()
            .symptom("fever")
            .biometric("temperature_c", 39.2)
            .pain_level(Some(4))
            .build()
            .unwrap();
        let assessment = assess_urgency(&report, "My fever is high");
        assert_eq!(assessment.tier, UrgencyTier::Urgent);
        assert_eq!(assessment.triggers, vec![Trigger::HighFever]);
    }

    #[test]
    fn routine_when_symptoms_present_without_red_flags() {
        let report =
            SymptomReport::builder().symptom("mild cough").pain_level(Some(2)).build().unwrap();
        let assessment = assess_urgency(&report, "I have mild cough for one day");
        assert_eq!(assessment.tier, UrgencyTier::Routine);
        assert_eq!(assessment.triggers, vec![Trigger::SymptomsPresent]);
    }

    #[test]
    fn self_care_without_any_signal() {
        let assessment = assess_urgency(&SymptomReport::default(), "   ");
        assert_eq!(assessment.tier, UrgencyTier::SelfCare);
        assert_eq!(assessment.triggers, vec![Trigger::NoRiskSignal]);
    }

    #[test]
    fn low_oxygen_is_emergency_even_as_text() {
        let report = SymptomReport::builder().biometric("oxygen_saturation", "90").build().unwrap();
        let assessment = assess_urgency(&report, "feeling tired");
        assert_eq!(assessment.tier, UrgencyTier::Emergency);
        assert_eq!(assessment.triggers, vec![Trigger::LowOxygenSaturation]);
    }

    #[test]
    fn oxygen_at_threshold_is_not_emergency() {
        let report = SymptomReport::builder().biometric("oxygen_saturation", 92.0).build().unwrap();
        assert_eq!(assess_urgency(&report, "feeling tired").tier, UrgencyTier::Routine);
    }

    #[test]
    fn non_numeric_biometrics_are_skipped() {
        let report = SymptomReport::builder()
            .biometric("oxygen_saturation", "low")
            .biometric("temperature_c", "hot")
            .build()
            .unwrap();
        assert_eq!(assess_urgency(&report, "feeling off").tier, UrgencyTier::Routine);
    }

    #[test]
    fn severe_pain_is_urgent() {
        let report = SymptomReport::builder().pain_level(Some(7)).build().unwrap();
        let assessment = assess_urgency(&report, "my knee hurts");
        assert_eq!(assessment.tier, UrgencyTier::Urgent);
        assert_eq!(assessment.triggers, vec![Trigger::SeverePain]);
    }

    #[test]
    fn biometric_rule_precedes_pain_and_keywords() {
        let report = SymptomReport::builder()
            .biometric("temperature_c", 39.5)
            .pain_level(Some(8))
            .build()
            .unwrap();
        let assessment = assess_urgency(&report, "wheezing and dehydration");
        assert_eq!(assessment.triggers, vec![Trigger::HighFever]);
    }

    #[test]
    fn urgent_keywords_record_every_hit_in_list_order() {
        let assessment =
            assess_urgency(&SymptomReport::default(), "Wheezing  and\tsome DEHYDRATION");
        assert_eq!(assessment.tier, UrgencyTier::Urgent);
        assert_eq!(
            assessment.triggers,
            vec![Trigger::Keyword("dehydration"), Trigger::Keyword("wheezing")]
        );
    }

    #[test]
    fn keywords_match_across_collapsed_whitespace() {
        let assessment = assess_urgency(&SymptomReport::default(), "sudden  SLURRED\n speech");
        assert_eq!(assessment.tier, UrgencyTier::Emergency);
        assert_eq!(assessment.triggers, vec![Trigger::Keyword("slurred speech")]);
    }

    #[test]
    fn normalize_lowercases_and_collapses() {
        assert_eq!(normalize("  Chest\t\tPAIN \n now "), "chest pain now");
    }
}
