use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::sections::SectionMap;
use crate::models::skills::SkillMatches;

// ────────────────────────────────────────────────────────────────────────────
// Per-stage metrics
// ────────────────────────────────────────────────────────────────────────────

/// Aggregate part-of-speech and entity counts over the full resume text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinguisticMetrics {
    pub noun_ratio: f64,
    pub verb_ratio: f64,
    pub org_count: u32,
    pub date_count: u32,
}

/// Keyword signals mined from the lowercased resume text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSignals {
    pub years_experience: u32,
    pub impact_mentions: u32,
    pub leadership_mentions: u32,
    pub deployment_mentions: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMetrics {
    pub total_unique: u32,
    pub total_mentions: u32,
    pub domain_diversity: u32,
}

/// Rule-based sub-scores, all in [0, 100] and rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub skill_metrics: SkillMetrics,
    pub rule_score: f64,
    pub confidence: f64,
    pub experience_score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Profile summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Fresher,
    Junior,
    Mid,
    Senior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub experience_level: ExperienceLevel,
    pub strong_domains: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs handed to the persistence layer
// ────────────────────────────────────────────────────────────────────────────

/// Full result of one resume analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAnalysis {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub sections: SectionMap,
    pub skills: SkillMatches,
    pub linguistic: Option<LinguisticMetrics>,
    pub experience: Option<ExperienceSignals>,
    pub evaluation: EvaluationResult,
    /// `None` when AI scoring was disabled or no JD requirements were supplied.
    pub semantic_score: Option<f64>,
    pub experience_score: f64,
    pub final_score: f64,
    pub confidence: f64,
    pub profile: ProfileSummary,
}

/// Resume skills compared against JD skills. Lists are sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub total_required: usize,
    pub total_matched: usize,
    pub match_percentage: f64,
}
