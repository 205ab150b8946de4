use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::semantic::DEFAULT_MODEL_NAME;

/// Engine configuration loaded from environment variables.
/// Every collaborator is optional; the engine degrades to offline rule-based scoring.
#[derive(Debug, Clone)]
pub struct Config {
    pub taxonomy_path: Option<PathBuf>,
    pub annotator_url: Option<String>,
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub ai_enabled: bool,
    pub chunk_max_chars: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            taxonomy_path: optional_env("SKILL_TAXONOMY_PATH").map(PathBuf::from),
            annotator_url: optional_env("ANNOTATOR_URL"),
            embedding_url: optional_env("EMBEDDING_URL"),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            http_timeout_secs: optional_env("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ai_enabled: parse_bool(
                "AI_ENABLED",
                optional_env("AI_ENABLED").as_deref().unwrap_or("false"),
            )?,
            chunk_max_chars: parse_chunk_max_chars(
                optional_env("CHUNK_MAX_CHARS").as_deref().unwrap_or("300"),
            )?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_chunk_max_chars(raw: &str) -> Result<usize> {
    raw.parse::<NonZeroUsize>()
        .map(NonZeroUsize::get)
        .with_context(|| format!("CHUNK_MAX_CHARS must be a positive integer, got {raw:?}"))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("AI_ENABLED", "true").unwrap());
        assert!(parse_bool("AI_ENABLED", "YES").unwrap());
        assert!(parse_bool("AI_ENABLED", "1").unwrap());
        assert!(!parse_bool("AI_ENABLED", "off").unwrap());
        assert!(!parse_bool("AI_ENABLED", "False").unwrap());
    }

    #[test]
    fn test_chunk_max_chars_must_be_positive() {
        assert_eq!(parse_chunk_max_chars("300").unwrap(), 300);
        for raw in ["0", "-5", "big"] {
            let err = parse_chunk_max_chars(raw).unwrap_err();
            assert!(err.to_string().contains("CHUNK_MAX_CHARS"), "{raw}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("AI_ENABLED", "maybe").unwrap_err();
        assert!(err.to_string().contains("AI_ENABLED"));
    }
}
