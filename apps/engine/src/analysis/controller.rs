//! Resume Analysis — orchestrates the full scoring pipeline.
//!
//! Flow: extract → segment → primary skills → linguistics → experience → evaluate →
//!       (fallback skills + re-evaluate when sparse) → (semantic score) → fuse → profile.
//!
//! Any stage error aborts the request; no partial analysis is ever returned.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::chunker::{chunk_text, DEFAULT_MAX_CHARS};
use crate::analysis::evaluator::{evaluate_resume, round2};
use crate::analysis::experience::extract_experience_signals;
use crate::analysis::fallback::extract_fallback_skills;
use crate::analysis::insights::build_profile;
use crate::analysis::matcher::compute_jd_match;
use crate::analysis::sections::segment_sections;
use crate::analysis::skills::{extract_skills, extract_skills_from_text};
use crate::errors::EngineError;
use crate::extraction::extract_blocking;
use crate::models::{FinalAnalysis, MatchResult};
use crate::nlp::{analyze_linguistics, Annotator, RuleAnnotator};
use crate::semantic::SemanticScorer;
use crate::taxonomy::SkillTaxonomy;

/// Below this many unique primary skills the noun-phrase fallback runs.
pub const FALLBACK_THRESHOLD: u32 = 4;

// ────────────────────────────────────────────────────────────────────────────
// Fusion weights
// ────────────────────────────────────────────────────────────────────────────

// Semantic + experience. These sum to 1.2 and are kept as-is so scores stay comparable with
// existing results.
const FULL_RULE_WEIGHT: f64 = 0.4;
const FULL_SEMANTIC_WEIGHT: f64 = 0.3;
const FULL_EXPERIENCE_WEIGHT: f64 = 0.5;

const SEMANTIC_RULE_WEIGHT: f64 = 0.7;
const SEMANTIC_WEIGHT: f64 = 0.3;

const EXPERIENCE_RULE_WEIGHT: f64 = 0.6;
const EXPERIENCE_WEIGHT: f64 = 0.4;

/// Per-request switches.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub ai_enabled: bool,
    /// Requirement statements for semantic scoring. `None` or empty skips it.
    pub jd_requirements: Option<Vec<String>>,
}

/// Combines the rule, semantic and experience scores. Experience only counts when at least one
/// year of experience was detected.
pub fn fuse_scores(
    rule_score: f64,
    semantic_score: Option<f64>,
    experience_score: f64,
    years_experience: u32,
) -> f64 {
    let has_years = years_experience > 0;
    let fused = match (semantic_score, has_years) {
        (Some(semantic), true) => {
            FULL_RULE_WEIGHT * rule_score
                + FULL_SEMANTIC_WEIGHT * semantic
                + FULL_EXPERIENCE_WEIGHT * experience_score
        }
        (Some(semantic), false) => SEMANTIC_RULE_WEIGHT * rule_score + SEMANTIC_WEIGHT * semantic,
        (None, true) => EXPERIENCE_RULE_WEIGHT * rule_score + EXPERIENCE_WEIGHT * experience_score,
        (None, false) => rule_score,
    };
    round2(fused)
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Shared, immutable pipeline. Cheap to clone; safe to use from concurrent requests.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    taxonomy: Arc<SkillTaxonomy>,
    annotator: Arc<dyn Annotator>,
    semantic: Option<Arc<SemanticScorer>>,
    chunk_max_chars: usize,
}

impl ResumeAnalyzer {
    pub fn new(taxonomy: Arc<SkillTaxonomy>, annotator: Arc<dyn Annotator>) -> Self {
        Self {
            taxonomy,
            annotator,
            semantic: None,
            chunk_max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Built-in taxonomy with the offline annotator and no semantic scorer.
    pub fn offline() -> Result<Self, EngineError> {
        Ok(Self::new(
            Arc::new(SkillTaxonomy::builtin()?),
            Arc::new(RuleAnnotator::new()),
        ))
    }

    pub fn with_semantic_scorer(mut self, scorer: Arc<SemanticScorer>) -> Self {
        self.semantic = Some(scorer);
        self
    }

    pub fn with_chunk_max_chars(mut self, max_chars: usize) -> Self {
        self.chunk_max_chars = max_chars;
        self
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    /// Extracts the document at `path` and analyzes it.
    pub async fn process_resume(
        &self,
        path: &Path,
        options: &AnalysisOptions,
    ) -> Result<FinalAnalysis, EngineError> {
        info!(path = %path.display(), ai = options.ai_enabled, "processing resume");
        let text = extract_blocking(path).await?;
        self.analyze_text(&text, options).await
    }

    /// Runs the pipeline on already-extracted text.
    pub async fn analyze_text(
        &self,
        text: &str,
        options: &AnalysisOptions,
    ) -> Result<FinalAnalysis, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyInput(
                "No text extracted from the resume.".to_string(),
            ));
        }

        let sections = segment_sections(text);
        let mut skills = extract_skills(&sections, &self.taxonomy);
        let linguistic = analyze_linguistics(self.annotator.as_ref(), text).await?;
        let experience = extract_experience_signals(text);

        let mut evaluation = evaluate_resume(&skills, linguistic.as_ref(), experience.as_ref());
        debug!(
            unique = evaluation.skill_metrics.total_unique,
            mentions = evaluation.skill_metrics.total_mentions,
            domains = evaluation.skill_metrics.domain_diversity,
            "primary skill extraction"
        );

        if evaluation.skill_metrics.total_unique < FALLBACK_THRESHOLD {
            let fallback =
                extract_fallback_skills(&sections, &self.taxonomy, self.annotator.as_ref()).await?;
            info!(
                primary = evaluation.skill_metrics.total_unique,
                backend = self.annotator.backend(),
                "sparse skills, running noun-phrase fallback"
            );
            skills.merge_additive(fallback);
            evaluation = evaluate_resume(&skills, linguistic.as_ref(), experience.as_ref());
        }

        let semantic_score = self.semantic_score(text, options).await?;

        let years = experience.as_ref().map_or(0, |e| e.years_experience);
        let final_score = fuse_scores(
            evaluation.rule_score,
            semantic_score,
            evaluation.experience_score,
            years,
        );
        let profile = build_profile(&skills, evaluation.experience_score);

        info!(
            rule = evaluation.rule_score,
            semantic = ?semantic_score,
            experience = evaluation.experience_score,
            final_score,
            "resume scored"
        );

        Ok(FinalAnalysis {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            experience_score: evaluation.experience_score,
            confidence: evaluation.confidence,
            sections,
            skills,
            linguistic,
            experience,
            evaluation,
            semantic_score,
            final_score,
            profile,
        })
    }

    async fn semantic_score(
        &self,
        text: &str,
        options: &AnalysisOptions,
    ) -> Result<Option<f64>, EngineError> {
        if !options.ai_enabled {
            return Ok(None);
        }
        let Some(requirements) = options.jd_requirements.as_deref().filter(|r| !r.is_empty())
        else {
            return Ok(None);
        };
        let Some(scorer) = &self.semantic else {
            warn!("AI scoring requested but no embedding model is configured");
            return Ok(None);
        };

        let chunks = chunk_text(text, self.chunk_max_chars)?;
        let score = scorer.compute_semantic_score(&chunks, requirements).await?;
        Ok(Some(score))
    }

    /// Matches the skills of the resume at `path` against skills found in a free-text JD.
    pub async fn match_resume_against_jd(
        &self,
        path: &Path,
        jd_text: &str,
    ) -> Result<MatchResult, EngineError> {
        let text = extract_blocking(path).await?;
        if text.trim().is_empty() {
            return Err(EngineError::EmptyInput(
                "No text extracted from the resume.".to_string(),
            ));
        }
        Ok(self.match_text_against_jd(&text, jd_text))
    }

    /// Primary-extractor skill sets of both texts, compared with the JD Matcher.
    pub fn match_text_against_jd(&self, resume_text: &str, jd_text: &str) -> MatchResult {
        let resume_skills = extract_skills(&segment_sections(resume_text), &self.taxonomy);
        let jd_skills = extract_skills_from_text(jd_text, &self.taxonomy);
        compute_jd_match(&resume_skills, &jd_skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::ExperienceLevel;
    use crate::nlp::Annotation;
    use crate::semantic::{EmbeddingModel, LazyModel, ModelLoader};

    /// Delegates to the rule annotator and counts calls.
    #[derive(Default)]
    struct CountingAnnotator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Annotator for CountingAnnotator {
        async fn annotate(&self, text: &str) -> Result<Annotation, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RuleAnnotator::new().annotate(text).await
        }

        fn backend(&self) -> &'static str {
            "counting"
        }
    }

    struct ConstantModel;

    #[async_trait]
    impl EmbeddingModel for ConstantModel {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct ConstantLoader;

    #[async_trait]
    impl ModelLoader for ConstantLoader {
        async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EngineError> {
            Ok(Arc::new(ConstantModel))
        }
    }

    const RESUME: &str = "SKILLS\n\
        Python, Flask and REST APIs\n\
        EXPERIENCE\n\
        Senior engineer with 5 years of experience. Team lead for the platform group, deployed \
        Python services to production and cut latency by 20%.\n\
        EDUCATION\n\
        BSc Computer Science, State University, 2019";

    fn analyzer(annotator: Arc<dyn Annotator>) -> ResumeAnalyzer {
        let taxonomy =
            SkillTaxonomy::from_json_str(r#"{"programming": {"python": ["python"]}}"#).unwrap();
        ResumeAnalyzer::new(Arc::new(taxonomy), annotator)
    }

    #[test]
    fn test_fusion_branches() {
        assert_eq!(fuse_scores(50.0, Some(80.0), 60.0, 3), 74.0);
        assert_eq!(fuse_scores(50.0, Some(80.0), 60.0, 0), 59.0);
        assert_eq!(fuse_scores(50.0, None, 60.0, 3), 54.0);
        assert_eq!(fuse_scores(50.0, None, 60.0, 0), 50.0);
    }

    #[test]
    fn test_full_fusion_can_exceed_component_scores() {
        assert_eq!(fuse_scores(100.0, Some(100.0), 100.0, 1), 120.0);
    }

    #[tokio::test]
    async fn test_scenario_skills_and_signals() {
        let analysis = analyzer(Arc::new(RuleAnnotator::new()))
            .analyze_text(RESUME, &AnalysisOptions::default())
            .await
            .unwrap();

        assert_eq!(analysis.skills.count("programming", "python"), Some(2));
        let signals = analysis.experience.clone().unwrap();
        assert_eq!(signals.years_experience, 5);
        assert_eq!(signals.impact_mentions, 1);
        assert!(signals.leadership_mentions >= 2);
        assert!(signals.deployment_mentions >= 2);

        assert!(analysis.semantic_score.is_none());
        // no semantic score, years > 0 → 0.6 rule + 0.4 experience
        let expected = round2(0.6 * analysis.evaluation.rule_score + 0.4 * analysis.experience_score);
        assert_eq!(analysis.final_score, expected);
        assert!(analysis.sections.education.contains("Computer Science"));
        assert_eq!(analysis.profile.strong_domains, vec!["programming"]);
    }

    #[tokio::test]
    async fn test_blank_text_runs_no_stage() {
        let annotator = Arc::new(CountingAnnotator::default());
        let err = analyzer(annotator.clone())
            .analyze_text("  \n\t ", &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput(_)));
        assert_eq!(err.code(), "EMPTY_INPUT");
        assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sparse_skills_trigger_fallback() {
        let annotator = Arc::new(CountingAnnotator::default());
        analyzer(annotator.clone())
            .analyze_text(RESUME, &AnalysisOptions::default())
            .await
            .unwrap();
        // one call for linguistics, one for the fallback
        assert_eq!(annotator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_skipped_at_threshold() {
        let taxonomy = SkillTaxonomy::from_json_str(
            r#"{
                "programming": {"python": ["python"], "rust": ["rust"]},
                "databases": {"redis": ["redis"], "postgresql": ["postgres"]}
            }"#,
        )
        .unwrap();
        let annotator = Arc::new(CountingAnnotator::default());
        let analysis = ResumeAnalyzer::new(Arc::new(taxonomy), annotator.clone())
            .analyze_text(
                "SKILLS\nPython, Rust, Redis and Postgres in production systems",
                &AnalysisOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            analysis.evaluation.skill_metrics.total_unique,
            FALLBACK_THRESHOLD
        );
        // linguistics only
        assert_eq!(annotator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_adds_skills_without_touching_primary_counts() {
        let taxonomy = SkillTaxonomy::from_json_str(
            r#"{
                "programming": {"python": ["python"]},
                "machine_learning": {"machine_learning": ["ml"]}
            }"#,
        )
        .unwrap();
        let analyzer = ResumeAnalyzer::new(Arc::new(taxonomy), Arc::new(RuleAnnotator::new()));
        let text = "SKILLS\nPython, Python, machine-learning and data analysis";
        let analysis = analyzer
            .analyze_text(text, &AnalysisOptions::default())
            .await
            .unwrap();
        assert_eq!(analysis.skills.count("programming", "python"), Some(2));
        assert_eq!(
            analysis.skills.count("machine_learning", "machine_learning"),
            Some(1)
        );
        assert_eq!(analysis.evaluation.skill_metrics.total_unique, 2);
    }

    #[tokio::test]
    async fn test_ai_without_scorer_degrades() {
        let options = AnalysisOptions {
            ai_enabled: true,
            jd_requirements: Some(vec!["Python".to_string()]),
        };
        let analysis = analyzer(Arc::new(RuleAnnotator::new()))
            .analyze_text(RESUME, &options)
            .await
            .unwrap();
        assert!(analysis.semantic_score.is_none());
    }

    #[tokio::test]
    async fn test_semantic_score_is_fused() {
        let scorer = Arc::new(SemanticScorer::new(LazyModel::new(ConstantLoader)));
        let analyzer = analyzer(Arc::new(RuleAnnotator::new())).with_semantic_scorer(scorer);

        let options = AnalysisOptions {
            ai_enabled: true,
            jd_requirements: Some(vec!["Python backend engineer".to_string()]),
        };
        let analysis = analyzer.analyze_text(RESUME, &options).await.unwrap();
        assert_eq!(analysis.semantic_score, Some(100.0));
        let expected = round2(
            0.4 * analysis.evaluation.rule_score + 0.3 * 100.0 + 0.5 * analysis.experience_score,
        );
        assert_eq!(analysis.final_score, expected);

        // empty requirements skip semantic scoring
        let options = AnalysisOptions {
            ai_enabled: true,
            jd_requirements: Some(vec![]),
        };
        let analysis = analyzer.analyze_text(RESUME, &options).await.unwrap();
        assert!(analysis.semantic_score.is_none());
    }

    #[tokio::test]
    async fn test_profile_for_fresh_graduate() {
        let text = "SKILLS\nJava, SQL, HTML and CSS basics\nEDUCATION\nBSc 2024";
        let analysis = ResumeAnalyzer::offline()
            .unwrap()
            .analyze_text(text, &AnalysisOptions::default())
            .await
            .unwrap();
        assert_eq!(analysis.profile.experience_level, ExperienceLevel::Fresher);
        assert_eq!(analysis.final_score, analysis.evaluation.rule_score);
    }

    #[test]
    fn test_match_text_against_jd() {
        let analyzer = ResumeAnalyzer::offline().unwrap();
        let result = analyzer.match_text_against_jd(
            "SKILLS\nPython, Docker and PostgreSQL in production",
            "We need Python and Kubernetes experience",
        );
        assert_eq!(result.matched_skills, vec!["python"]);
        assert_eq!(result.missing_skills, vec!["kubernetes"]);
        assert_eq!(result.extra_skills, vec!["docker", "postgresql"]);
        assert_eq!(result.match_percentage, 50.0);
    }
}
