use clap::{Parser, ValueEnum};
use neurohealth_triage::HealthLiteracy;

#[derive(Parser, Debug)]
#[command(name = "neurohealth", version, about = "NeuroHealth health-guidance assistant")]
pub struct Cli {
    /// Latest user health question or message.
    #[arg(long, required_unless_present = "interactive")]
    pub query: Option<String>,

    /// Run in interactive chat mode.
    #[arg(long, default_value_t = false)]
    pub interactive: bool,

    /// User age in years.
    #[arg(long)]
    pub age: Option<i32>,

    /// Comma-separated user preferences.
    #[arg(long, default_value = "")]
    pub preferences: String,

    /// Comma-separated medical constraints (e.g. knee pain, hypertension).
    #[arg(long, default_value = "")]
    pub medical_constraints: String,

    /// Comma-separated chronic conditions.
    #[arg(long, default_value = "")]
    pub chronic_conditions: String,

    /// Health literacy level for response adaptation.
    #[arg(long, value_enum, default_value_t = LiteracyArg::Intermediate)]
    pub health_literacy: LiteracyArg,

    /// Comma-separated symptoms.
    #[arg(long, default_value = "")]
    pub symptoms: String,

    /// Symptom duration in hours.
    #[arg(long)]
    pub duration_hours: Option<i64>,

    /// Pain level (0-10).
    #[arg(long)]
    pub pain_level: Option<i32>,

    /// Repeatable key=value biometric input (e.g. temperature_c=38.4).
    #[arg(long = "biometric")]
    pub biometrics: Vec<String>,

    /// Optional feedback rating (1-5) recorded after a one-shot answer.
    #[arg(long)]
    pub feedback_rating: Option<i32>,

    /// Optional feedback comment.
    #[arg(long, default_value = "")]
    pub feedback_comment: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LiteracyArg {
    Basic,
    Intermediate,
    Advanced,
}

impl From<LiteracyArg> for HealthLiteracy {
    fn from(arg: LiteracyArg) -> Self {
        match arg {
            LiteracyArg::Basic => HealthLiteracy::Basic,
            LiteracyArg::Intermediate => HealthLiteracy::Intermediate,
            LiteracyArg::Advanced => HealthLiteracy::Advanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_required_outside_interactive_mode() {
        assert!(Cli::try_parse_from(["neurohealth"]).is_err());
        assert!(Cli::try_parse_from(["neurohealth", "--interactive"]).is_ok());
    }

    #[test]
    fn collects_repeated_biometrics() {
        let cli = Cli::try_parse_from([
            "neurohealth",
            "--query",
            "fever",
            "--biometric",
            "temperature_c=38.4",
            "--biometric",
            "heart_rate=101",
            "--health-literacy",
            "basic",
            "--pain-level",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.biometrics, ["temperature_c=38.4", "heart_rate=101"]);
        assert_eq!(HealthLiteracy::from(cli.health_literacy), HealthLiteracy::Basic);
        assert_eq!(cli.pain_level, Some(3));
        assert!(cli.feedback_rating.is_none());
    }
}
