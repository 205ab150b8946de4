use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_engine::analysis::jd::resolve_jd_requirements;
use resume_engine::analysis::matcher::compute_jd_match_value;
use resume_engine::config::Config;
use resume_engine::state::build_analyzer;
use resume_engine::{AnalysisOptions, EngineError, ErrorEnvelope, ResumeAnalyzer};

// ── CLI ─────────────────────────────────────────────────────────────

/// Scores PDF/DOCX resumes and matches them against job descriptions.
#[derive(Parser, Debug)]
#[command(name = "resume-engine", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a resume and print the full scoring result.
    Analyze {
        file: PathBuf,
        #[command(flatten)]
        jd: JdArgs,
        /// Enable semantic scoring (also enabled by AI_ENABLED=true).
        #[arg(long)]
        ai: bool,
    },
    /// Compare resume skills against skills found in a job description.
    Match {
        file: PathBuf,
        #[command(flatten)]
        jd: JdArgs,
    },
    /// Compare two skill maps given as JSON files.
    MatchJson {
        resume_skills: PathBuf,
        jd_skills: PathBuf,
    },
}

#[derive(Args, Debug)]
struct JdArgs {
    /// Job description text.
    #[arg(long, group = "jd_source")]
    jd: Option<String>,
    /// File containing the job description.
    #[arg(long, group = "jd_source")]
    jd_file: Option<PathBuf>,
}

impl JdArgs {
    fn text(&self) -> Result<Option<String>, EngineError> {
        match (&self.jd, &self.jd_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => read_input(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so stdout carries only JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_engine={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("resume-engine v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = build_analyzer(&config)?;

    let outcome = match cli.command {
        Command::Analyze { file, jd, ai } => {
            run_analyze(&analyzer, &file, &jd, ai || config.ai_enabled).await
        }
        Command::Match { file, jd } => run_match(&analyzer, &file, &jd).await,
        Command::MatchJson {
            resume_skills,
            jd_skills,
        } => run_match_json(&resume_skills, &jd_skills),
    };

    match outcome {
        Ok(json) => {
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(code = err.code(), "{err}");
            println!("{}", to_json(&ErrorEnvelope::from(&err))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── commands ────────────────────────────────────────────────────────

async fn run_analyze(
    analyzer: &ResumeAnalyzer,
    file: &Path,
    jd: &JdArgs,
    ai_enabled: bool,
) -> Result<String, EngineError> {
    let jd_text = jd.text()?;
    let options = AnalysisOptions {
        ai_enabled,
        jd_requirements: Some(resolve_jd_requirements(jd_text.as_deref())),
    };
    let analysis = analyzer.process_resume(file, &options).await?;
    to_json(&analysis).map_err(|e| EngineError::InputValidation(e.to_string()))
}

async fn run_match(
    analyzer: &ResumeAnalyzer,
    file: &Path,
    jd: &JdArgs,
) -> Result<String, EngineError> {
    let jd_text = jd.text()?.ok_or_else(|| {
        EngineError::InputValidation("A job description is required (--jd or --jd-file).".into())
    })?;
    let result = analyzer.match_resume_against_jd(file, &jd_text).await?;
    to_json(&result).map_err(|e| EngineError::InputValidation(e.to_string()))
}

fn run_match_json(resume_skills: &Path, jd_skills: &Path) -> Result<String, EngineError> {
    let resume = read_json(resume_skills)?;
    let jd = read_json(jd_skills)?;
    let result = compute_jd_match_value(&resume, &jd)?;
    to_json(&result).map_err(|e| EngineError::InputValidation(e.to_string()))
}

// ── helpers ─────────────────────────────────────────────────────────

fn read_input(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EngineError::NotFound(path.display().to_string()),
        _ => EngineError::InputValidation(format!("cannot read {}: {e}", path.display())),
    })
}

fn read_json(path: &Path) -> Result<Value, EngineError> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        EngineError::InputValidation(format!("{} is not valid JSON: {e}", path.display()))
    })
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(&dir.path().join("jd.txt")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_read_input_other_failures_are_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        // a directory is not a readable file
        let err = read_input(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::InputValidation(_)));

        let binary = dir.path().join("jd.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        let err = read_input(&binary).unwrap_err();
        assert!(matches!(err, EngineError::InputValidation(_)));
    }

    #[test]
    fn test_read_json_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
