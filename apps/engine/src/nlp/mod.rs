//! Linguistic annotation — the external POS/NER capability the engine consumes.
//!
//! The engine only ever sees aggregate counts and noun-chunk lemmas, so any annotator that can
//! produce an `Annotation` plugs in: a spaCy-style HTTP service (`HttpAnnotator`) or the offline
//! `RuleAnnotator`. The controller holds an `Arc<dyn Annotator>` chosen at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::LinguisticMetrics;

pub mod http;
pub mod rules;

pub use http::HttpAnnotator;
pub use rules::RuleAnnotator;

// ────────────────────────────────────────────────────────────────────────────
// Annotation data model (spaCy-shaped)
// ────────────────────────────────────────────────────────────────────────────

/// Universal POS tags the engine cares about; everything else collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Noun,
    Propn,
    Verb,
    Adj,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Org,
    Date,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: PosTag,
    pub lemma: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// A base noun phrase, as the lemmas of its tokens in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NounChunk {
    pub lemmas: Vec<String>,
}

impl NounChunk {
    /// Lemmas joined with single spaces.
    pub fn lemma_phrase(&self) -> String {
        crate::analysis::text::collapse_whitespace(&self.lemmas.join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub noun_chunks: Vec<NounChunk>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap annotation backends without touching the controller.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<Annotation, EngineError>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Linguistic Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Computes POS ratios and ORG/DATE entity counts. Blank text yields `None`.
pub async fn analyze_linguistics(
    annotator: &dyn Annotator,
    text: &str,
) -> Result<Option<LinguisticMetrics>, EngineError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let annotation = annotator.annotate(text).await?;
    Ok(Some(linguistic_metrics(&annotation)))
}

pub fn linguistic_metrics(annotation: &Annotation) -> LinguisticMetrics {
    let total = annotation.tokens.len();
    let nouns = annotation
        .tokens
        .iter()
        .filter(|t| matches!(t.pos, PosTag::Noun | PosTag::Propn))
        .count();
    let verbs = annotation
        .tokens
        .iter()
        .filter(|t| t.pos == PosTag::Verb)
        .count();
    let count_label = |label: EntityLabel| {
        let n = annotation.entities.iter().filter(|e| e.label == label).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    };

    let ratio = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

    LinguisticMetrics {
        noun_ratio: ratio(nouns),
        verb_ratio: ratio(verbs),
        org_count: count_label(EntityLabel::Org),
        date_count: count_label(EntityLabel::Date),
    }
}
