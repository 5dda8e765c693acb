//! Request-side data model: symptom reports, user profiles, and urgency tiers.
//!
//! [`SymptomReport`] and [`UserProfile`] validate on construction, including
//! when deserialized, so a value of either type is always in range.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, ValidationError};

/// A biometric reading as supplied by the user.
///
/// Readings are kept in their original representation. Rules that need a
/// number call [`as_f64`](Self::as_f64), which also accepts numeric-looking text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BiometricValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl BiometricValue {
    /// The reading as a finite number, if it is one or parses as one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            BiometricValue::Integer(v) => *v as f64,
            BiometricValue::Number(v) => *v,
            BiometricValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Parse a `key=value` entry.
    ///
    /// Values containing a `.` are tried as floats first, then integers; anything
    /// else that is not an integer is kept as text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedBiometric`] if the `=` is missing or
    /// either side is blank.
    pub fn parse_entry(entry: &str) -> Result<(String, BiometricValue)> {
        let malformed = |reason| ValidationError::MalformedBiometric { entry: entry.to_string(), reason };

        let (key, raw) = entry.split_once('=').ok_or_else(|| malformed("expected key=value"))?;
        let key = key.trim();
        let raw = raw.trim();
        if key.is_empty() {
            return Err(malformed("metric name is empty"));
        }
        if raw.is_empty() {
            return Err(malformed("value is empty"));
        }

        if raw.contains('.') {
            if let Ok(number) = raw.parse::<f64>() {
                return Ok((key.to_string(), BiometricValue::Number(number)));
            }
        }
        let value = match raw.parse::<i64>() {
            Ok(integer) => BiometricValue::Integer(integer),
            Err(_) => BiometricValue::Text(raw.to_string()),
        };
        Ok((key.to_string(), value))
    }
}

impl From<f64> for BiometricValue {
    fn from(value: f64) -> Self {
        BiometricValue::Number(value)
    }
}

impl From<i64> for BiometricValue {
    fn from(value: i64) -> Self {
        BiometricValue::Integer(value)
    }
}

impl From<&str> for BiometricValue {
    fn from(value: &str) -> Self {
        BiometricValue::Text(value.to_string())
    }
}

impl From<String> for BiometricValue {
    fn from(value: String) -> Self {
        BiometricValue::Text(value)
    }
}

/// Reported symptoms, biometrics, duration, and pain level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SymptomReportFields")]
pub struct SymptomReport {
    symptoms: Vec<String>,
    biometrics: BTreeMap<String, BiometricValue>,
    duration_hours: Option<i64>,
    pain_level: Option<i32>,
}

#[derive(Deserialize)]
struct SymptomReportFields {
    #[serde(default)]
    symptoms: Vec<String>,
    // A null reading is treated as not measured.
    #[serde(default)]
    biometrics: BTreeMap<String, Option<BiometricValue>>,
    #[serde(default)]
    duration_hours: Option<i64>,
    #[serde(default)]
    pain_level: Option<i32>,
}

impl TryFrom<SymptomReportFields> for SymptomReport {
    type Error = ValidationError;

    fn try_from(fields: SymptomReportFields) -> Result<Self> {
        let biometrics = fields
            .biometrics
            .into_iter()
            .filter_map(|(metric, value)| value.map(|value| (metric, value)))
            .collect();
        SymptomReport::new(fields.symptoms, biometrics, fields.duration_hours, fields.pain_level)
    }
}

impl SymptomReport {
    /// Create a validated report.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeDuration`] or
    /// [`ValidationError::PainLevelOutOfRange`].
    pub fn new(
        symptoms: Vec<String>,
        biometrics: BTreeMap<String, BiometricValue>,
        duration_hours: Option<i64>,
        pain_level: Option<i32>,
    ) -> Result<Self> {
        if let Some(hours) = duration_hours.filter(|h| *h < 0) {
            return Err(ValidationError::NegativeDuration(hours));
        }
        if let Some(level) = pain_level.filter(|p| !(0..=10).contains(p)) {
            return Err(ValidationError::PainLevelOutOfRange(level));
        }
        Ok(Self { symptoms, biometrics, duration_hours, pain_level })
    }

    /// Create a new builder for constructing a [`SymptomReport`].
    pub fn builder() -> SymptomReportBuilder {
        SymptomReportBuilder::default()
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn biometrics(&self) -> &BTreeMap<String, BiometricValue> {
        &self.biometrics
    }

    /// Numeric value of a biometric, or `None` if absent or not numeric.
    pub fn numeric_biometric(&self, metric: &str) -> Option<f64> {
        self.biometrics.get(metric).and_then(BiometricValue::as_f64)
    }

    pub fn duration_hours(&self) -> Option<i64> {
        self.duration_hours
    }

    pub fn pain_level(&self) -> Option<i32> {
        self.pain_level
    }
}

/// Builder for a validated [`SymptomReport`].
#[derive(Debug, Clone, Default)]
pub struct SymptomReportBuilder {
    symptoms: Vec<String>,
    biometrics: BTreeMap<String, BiometricValue>,
    duration_hours: Option<i64>,
    pain_level: Option<i32>,
}

impl SymptomReportBuilder {
    /// Append one symptom phrase.
    pub fn symptom(mut self, symptom: impl Into<String>) -> Self {
        self.symptoms.push(symptom.into());
        self
    }

    /// Append several symptom phrases in order.
    pub fn symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symptoms.extend(symptoms.into_iter().map(Into::into));
        self
    }

    /// Set a biometric reading, replacing any earlier value for the same metric.
    pub fn biometric(mut self, metric: impl Into<String>, value: impl Into<BiometricValue>) -> Self {
        self.biometrics.insert(metric.into(), value.into());
        self
    }

    /// Set all biometric readings at once.
    pub fn biometrics(mut self, biometrics: BTreeMap<String, BiometricValue>) -> Self {
        self.biometrics = biometrics;
        self
    }

    pub fn duration_hours(mut self, hours: Option<i64>) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn pain_level(mut self, level: Option<i32>) -> Self {
        self.pain_level = level;
        self
    }

    /// Build the report, validating duration and pain level.
    pub fn build(self) -> Result<SymptomReport> {
        SymptomReport::new(self.symptoms, self.biometrics, self.duration_hours, self.pain_level)
    }
}

/// How technical the assistant's language may be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLiteracy {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl HealthLiteracy {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthLiteracy::Basic => "basic",
            HealthLiteracy::Intermediate => "intermediate",
            HealthLiteracy::Advanced => "advanced",
        }
    }
}

impl fmt::Display for HealthLiteracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthLiteracy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(HealthLiteracy::Basic),
            "intermediate" => Ok(HealthLiteracy::Intermediate),
            "advanced" => Ok(HealthLiteracy::Advanced),
            other => Err(ValidationError::UnknownHealthLiteracy(other.to_string())),
        }
    }
}

/// Personal context used to tailor guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserProfileFields")]
pub struct UserProfile {
    age: Option<i32>,
    preferences: Vec<String>,
    medical_constraints: Vec<String>,
    chronic_conditions: Vec<String>,
    health_literacy: HealthLiteracy,
}

#[derive(Deserialize)]
struct UserProfileFields {
    #[serde(default)]
    age: Option<i32>,
    #[serde(default)]
    preferences: Vec<String>,
    #[serde(default)]
    medical_constraints: Vec<String>,
    #[serde(default)]
    chronic_conditions: Vec<String>,
    #[serde(default)]
    health_literacy: HealthLiteracy,
}

impl TryFrom<UserProfileFields> for UserProfile {
    type Error = ValidationError;

    fn try_from(fields: UserProfileFields) -> Result<Self> {
        UserProfile::builder()
            .age(fields.age)
            .preferences(fields.preferences)
            .medical_constraints(fields.medical_constraints)
            .chronic_conditions(fields.chronic_conditions)
            .health_literacy(fields.health_literacy)
            .build()
    }
}

impl UserProfile {
    /// Create a new builder for constructing a [`UserProfile`].
    pub fn builder() -> UserProfileBuilder {
        UserProfileBuilder::default()
    }

    pub fn age(&self) -> Option<i32> {
        self.age
    }

    pub fn preferences(&self) -> &[String] {
        &self.preferences
    }

    pub fn medical_constraints(&self) -> &[String] {
        &self.medical_constraints
    }

    pub fn chronic_conditions(&self) -> &[String] {
        &self.chronic_conditions
    }

    pub fn health_literacy(&self) -> HealthLiteracy {
        self.health_literacy
    }
}

/// Builder for a validated [`UserProfile`].
#[derive(Debug, Clone, Default)]
pub struct UserProfileBuilder {
    profile: UserProfile,
}

impl UserProfileBuilder {
    pub fn age(mut self, age: Option<i32>) -> Self {
        self.profile.age = age;
        self
    }

    pub fn preferences(mut self, preferences: Vec<String>) -> Self {
        self.profile.preferences = preferences;
        self
    }

    pub fn medical_constraints(mut self, constraints: Vec<String>) -> Self {
        self.profile.medical_constraints = constraints;
        self
    }

    pub fn chronic_conditions(mut self, conditions: Vec<String>) -> Self {
        self.profile.chronic_conditions = conditions;
        self
    }

    pub fn health_literacy(mut self, literacy: HealthLiteracy) -> Self {
        self.profile.health_literacy = literacy;
        self
    }

    /// Build the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveAge`] if an age of zero or less was set.
    pub fn build(self) -> Result<UserProfile> {
        if let Some(age) = self.profile.age.filter(|a| *a <= 0) {
            return Err(ValidationError::NonPositiveAge(age));
        }
        Ok(self.profile)
    }
}

/// Escalation level, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    SelfCare,
    Routine,
    Urgent,
    Emergency,
}

impl UrgencyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyTier::SelfCare => "self_care",
            UrgencyTier::Routine => "routine",
            UrgencyTier::Urgent => "urgent",
            UrgencyTier::Emergency => "emergency",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a tier was chosen. Renders as a machine-readable tag such as
/// `keyword:chest pain` or `biometric:high_fever`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Keyword(&'static str),
    LowOxygenSaturation,
    HighFever,
    SeverePain,
    SymptomsPresent,
    NoRiskSignal,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Keyword(phrase) => write!(f, "keyword:{phrase}"),
            Trigger::LowOxygenSaturation => f.write_str("biometric:low_oxygen_saturation"),
            Trigger::HighFever => f.write_str("biometric:high_fever"),
            Trigger::SeverePain => f.write_str("pain_level:>=7"),
            Trigger::SymptomsPresent => f.write_str("symptoms_present"),
            Trigger::NoRiskSignal => f.write_str("no_risk_signal"),
        }
    }
}

impl Serialize for Trigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_duration_and_out_of_range_pain() {
        let err = SymptomReport::builder().duration_hours(Some(-1)).build().unwrap_err();
        assert_eq!(err, ValidationError::NegativeDuration(-1));

        let err = SymptomReport::builder().pain_level(Some(11)).build().unwrap_err();
        assert_eq!(err, ValidationError::PainLevelOutOfRange(11));

        let err = SymptomReport::builder().pain_level(Some(-1)).build().unwrap_err();
        assert_eq!(err, ValidationError::PainLevelOutOfRange(-1));

        assert!(SymptomReport::builder().duration_hours(Some(0)).pain_level(Some(10)).build().is_ok());
    }

    #[test]
    fn null_biometric_deserializes_as_absent() {
        let report: SymptomReport = serde_json::from_str(
            r#"{"symptoms": ["cough"], "biometrics": {"temperature_c": null, "heart_rate": 88}}"#,
        )
        .unwrap();
        assert!(!report.biometrics().contains_key("temperature_c"));
        assert_eq!(report.numeric_biometric("heart_rate"), Some(88.0));

        let assessment = crate::classifier::assess_urgency(&report, "");
        assert_eq!(assessment.tier, UrgencyTier::Routine);
    }

    #[test]
    fn deserialization_runs_validation() {
        let ok: SymptomReport = serde_json::from_str(
            r#"{"symptoms": ["fever"], "biometrics": {"temperature_c": 39.2}, "pain_level": 4}"#,
        )
        .unwrap();
        assert_eq!(ok.numeric_biometric("temperature_c"), Some(39.2));

        let bad = serde_json::from_str::<SymptomReport>(r#"{"pain_level": 12}"#);
        assert!(bad.is_err());

        let bad_age = serde_json::from_str::<UserProfile>(r#"{"age": 0}"#);
        assert!(bad_age.is_err());
    }

    #[test]
    fn numeric_biometrics_accept_numeric_text_only() {
        let report = SymptomReport::builder()
            .biometric("oxygen_saturation", "91.5")
            .biometric("temperature_c", "warm")
            .biometric("heart_rate", 88_i64)
            .build()
            .unwrap();

        assert_eq!(report.numeric_biometric("oxygen_saturation"), Some(91.5));
        assert_eq!(report.numeric_biometric("temperature_c"), None);
        assert_eq!(report.numeric_biometric("heart_rate"), Some(88.0));
        assert_eq!(report.numeric_biometric("absent"), None);
        assert_eq!(BiometricValue::from("NaN").as_f64(), None);
    }

    #[test]
    fn parses_biometric_entries() {
        assert_eq!(
            BiometricValue::parse_entry("temperature_c=37.8").unwrap(),
            ("temperature_c".to_string(), BiometricValue::Number(37.8))
        );
        assert_eq!(
            BiometricValue::parse_entry(" heart_rate = 89 ").unwrap(),
            ("heart_rate".to_string(), BiometricValue::Integer(89))
        );
        assert_eq!(
            BiometricValue::parse_entry("note=slight cough").unwrap(),
            ("note".to_string(), BiometricValue::Text("slight cough".into()))
        );
        assert!(BiometricValue::parse_entry("invalid").is_err());
        assert!(BiometricValue::parse_entry("=5").is_err());
        assert!(BiometricValue::parse_entry("bp= ").is_err());
    }

    #[test]
    fn profile_rejects_non_positive_age() {
        assert_eq!(
            UserProfile::builder().age(Some(0)).build().unwrap_err(),
            ValidationError::NonPositiveAge(0)
        );
        assert_eq!(UserProfile::builder().age(Some(40)).build().unwrap().age(), Some(40));
    }

    #[test]
    fn health_literacy_parses_case_insensitively() {
        assert_eq!("Basic".parse::<HealthLiteracy>().unwrap(), HealthLiteracy::Basic);
        assert!("expert".parse::<HealthLiteracy>().is_err());
        assert_eq!(HealthLiteracy::default(), HealthLiteracy::Intermediate);
    }

    #[test]
    fn tiers_order_by_severity_and_render_snake_case() {
        assert!(UrgencyTier::SelfCare < UrgencyTier::Routine);
        assert!(UrgencyTier::Urgent < UrgencyTier::Emergency);
        assert_eq!(serde_json::to_string(&UrgencyTier::SelfCare).unwrap(), "\"self_care\"");
    }

    #[test]
    fn triggers_render_as_tags() {
        assert_eq!(Trigger::Keyword("chest pain").to_string(), "keyword:chest pain");
        assert_eq!(Trigger::SeverePain.to_string(), "pain_level:>=7");
        assert_eq!(
            serde_json::to_string(&Trigger::LowOxygenSaturation).unwrap(),
            "\"biometric:low_oxygen_saturation\""
        );
    }
}
