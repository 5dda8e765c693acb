mod cli;
mod parse;
mod runtime;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use neurohealth_engine::{
    ConversationTurn, HealthEngine, HealthRequest, Recommendation, RecommendationFeedback, Settings,
};
use neurohealth_triage::{SymptomReport, UserProfile};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::parse::{parse_biometrics, parse_csv, parse_optional_int};

#[tokio::main]
async fn main() {
    init_tracing(load_env(None));

    if let Err(err) = run().await {
        error!(error = %err, "neurohealth failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

/// Load `.env` entries, then build the log filter from `RUST_LOG` (default `info`).
///
/// Variables already in the environment win over `.env` entries. `None` searches
/// the working directory and its parents for `.env`.
fn load_env(env_file: Option<&Path>) -> EnvFilter {
    match env_file {
        Some(path) => dotenvy::from_path(path).ok(),
        None => dotenvy::dotenv().ok().map(drop),
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing(env_filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    info!(?settings, "settings resolved");

    let profile = build_profile(&cli)?;
    let engine = runtime::build_engine(&settings).await?;

    if cli.interactive {
        return run_interactive(&engine, profile).await;
    }

    let query = cli.query.as_deref().context("--query is required unless running --interactive")?;
    let report = SymptomReport::builder()
        .symptoms(parse_csv(&cli.symptoms))
        .biometrics(parse_biometrics(&cli.biometrics)?)
        .duration_hours(cli.duration_hours)
        .pain_level(cli.pain_level)
        .build()?;
    let request = HealthRequest::new(query)?.with_profile(profile).with_symptom_report(report);

    let recommendation = engine.recommend(&request).await?;
    println!("{}", serde_json::to_string_pretty(&recommendation)?);

    if let Some(rating) = cli.feedback_rating {
        let conversation_id = uuid::Uuid::new_v4().to_string();
        let feedback =
            RecommendationFeedback::new(&conversation_id, rating, cli.feedback_comment.as_str())?;
        engine.record_feedback(&feedback).await?;
        info!(%conversation_id, rating, "feedback recorded");
    }

    Ok(())
}

fn build_profile(cli: &Cli) -> Result<UserProfile> {
    Ok(UserProfile::builder()
        .age(cli.age)
        .preferences(parse_csv(&cli.preferences))
        .medical_constraints(parse_csv(&cli.medical_constraints))
        .chronic_conditions(parse_csv(&cli.chronic_conditions))
        .health_literacy(cli.health_literacy.into())
        .build()?)
}

/// Read one line, mapping Ctrl-C and Ctrl-D to `None`.
fn read_line(editor: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_report(editor: &mut DefaultEditor) -> Result<Option<SymptomReport>> {
    let Some(symptoms) = read_line(editor, "Symptoms (comma-separated, optional): ")? else {
        return Ok(None);
    };
    let Some(duration) = read_line(editor, "Duration hours (optional): ")? else {
        return Ok(None);
    };
    let Some(pain) = read_line(editor, "Pain level 0-10 (optional): ")? else {
        return Ok(None);
    };
    let Some(biometrics) = read_line(editor, "Biometrics key=value (comma-separated, optional): ")?
    else {
        return Ok(None);
    };

    let report = SymptomReport::builder()
        .symptoms(parse_csv(&symptoms))
        .duration_hours(parse_optional_int(&duration)?)
        .pain_level(parse_optional_int(&pain)?)
        .biometrics(parse_biometrics(parse_csv(&biometrics))?)
        .build()?;
    Ok(Some(report))
}

fn print_recommendation(recommendation: &Recommendation) {
    println!("\nAssistant:\n{}", recommendation.assistant_message);
    println!("\nUrgency: {}", recommendation.urgency);
    println!("Appointment: {}", recommendation.appointment_recommendation);
    println!("Safety instructions:");
    for instruction in &recommendation.safety_instructions {
        println!("- {instruction}");
    }
    if !recommendation.clarifying_questions.is_empty() {
        println!("Clarifying questions:");
        for question in &recommendation.clarifying_questions {
            println!("- {question}");
        }
    }
    println!();
}

async fn run_interactive(engine: &HealthEngine, profile: UserProfile) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut history: Vec<ConversationTurn> = Vec::new();
    println!("NeuroHealth interactive mode. Type 'exit' to quit.");

    loop {
        let Some(query) = read_line(&mut editor, "You: ")? else {
            break;
        };
        if matches!(query.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        if query.is_empty() {
            println!("Please enter a message.");
            continue;
        }
        let _ = editor.add_history_entry(query.as_str());

        // Bad optional fields should not end the session.
        let report = match read_report(&mut editor) {
            Ok(Some(report)) => report,
            Ok(None) => break,
            Err(e) => {
                println!("Invalid input: {e}");
                continue;
            }
        };

        let request = HealthRequest::new(query.as_str())?
            .with_profile(profile.clone())
            .with_symptom_report(report)
            .with_history(history.clone());

        match engine.recommend(&request).await {
            Ok(recommendation) => {
                print_recommendation(&recommendation);
                history.push(ConversationTurn::user(query)?);
                history.push(ConversationTurn::assistant(recommendation.assistant_message)?);
            }
            Err(e) => {
                error!(error = %e, "recommendation failed");
                println!("Sorry, I could not produce a recommendation: {e}\n");
            }
        }
    }

    Ok(())
}
