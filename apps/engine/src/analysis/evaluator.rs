//! Rule Evaluator — turns skill, linguistic and experience metrics into fixed-weight scores.
//!
//! Every function here is pure; all divisions go through `normalization`, so nothing can fail.

use crate::models::{
    EvaluationResult, ExperienceSignals, LinguisticMetrics, SkillMatches, SkillMetrics,
};

/// Fixed reference points and weights. Not tunable at runtime.
pub mod reference {
    pub const MAX_DOMAINS: f64 = 8.0;
    pub const MAX_UNIQUE_SKILLS: f64 = 25.0;
    pub const MAX_MENTIONS: f64 = 60.0;
    pub const MIN_VERB_RATIO: f64 = 0.07;

    pub const BREADTH_WEIGHT: f64 = 0.30;
    pub const DEPTH_WEIGHT: f64 = 0.35;
    pub const INTENSITY_WEIGHT: f64 = 0.20;
    pub const LINGUISTIC_WEIGHT: f64 = 0.15;

    pub const VERB_BONUS: f64 = 0.6;
    pub const ORG_BONUS: f64 = 0.4;

    pub const MAX_YEARS: f64 = 8.0;
    pub const MAX_IMPACT: f64 = 5.0;
    pub const MAX_LEADERSHIP: f64 = 5.0;
    pub const MAX_DEPLOYMENT: f64 = 5.0;

    pub const YEARS_WEIGHT: f64 = 0.35;
    pub const IMPACT_WEIGHT: f64 = 0.25;
    pub const LEADERSHIP_WEIGHT: f64 = 0.20;
    pub const DEPLOYMENT_WEIGHT: f64 = 0.20;
}

use reference::*;

/// Rounds to 2 decimals on the exact binary value, ties to even (`17.125` gives `17.12`).
///
/// Precision formatting is correctly rounded, unlike scaling by 100 first, which can push a value
/// sitting just under a tie across it.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// `min(value / reference, 1)`, or 0 when the reference is not positive.
pub fn normalization(value: f64, reference: f64) -> f64 {
    if reference <= 0.0 {
        return 0.0;
    }
    (value / reference).clamp(0.0, 1.0)
}

pub fn evaluate_skill(skills: &SkillMatches) -> SkillMetrics {
    skills
        .iter()
        .filter(|(_, found)| !found.is_empty())
        .fold(SkillMetrics::default(), |mut metrics, (_, found)| {
            metrics.domain_diversity += 1;
            metrics.total_unique += u32::try_from(found.len()).unwrap_or(u32::MAX);
            metrics.total_mentions = metrics
                .total_mentions
                .saturating_add(found.values().copied().fold(0u32, u32::saturating_add));
            metrics
        })
}

/// 0.6 for an active writing style (enough verbs), +0.4 when any organization is named.
fn linguistic_score(linguistic: Option<&LinguisticMetrics>) -> f64 {
    let Some(metrics) = linguistic else {
        return 0.0;
    };
    let mut score = 0.0;
    if metrics.verb_ratio >= MIN_VERB_RATIO {
        score += VERB_BONUS;
    }
    if metrics.org_count > 0 {
        score += ORG_BONUS;
    }
    score
}

pub fn compute_rule_score(skill: &SkillMetrics, linguistic: Option<&LinguisticMetrics>) -> f64 {
    let breadth = normalization(f64::from(skill.domain_diversity), MAX_DOMAINS);
    let depth = normalization(f64::from(skill.total_unique), MAX_UNIQUE_SKILLS);
    let intensity = normalization(f64::from(skill.total_mentions), MAX_MENTIONS);

    let score = breadth * BREADTH_WEIGHT
        + depth * DEPTH_WEIGHT
        + intensity * INTENSITY_WEIGHT
        + linguistic_score(linguistic) * LINGUISTIC_WEIGHT;

    round2(score * 100.0)
}

pub fn compute_confidence(skill: &SkillMetrics) -> f64 {
    if skill.total_unique == 0 || skill.domain_diversity == 0 {
        return 0.0;
    }

    let structural = normalization(f64::from(skill.total_unique), MAX_UNIQUE_SKILLS);
    let diversity = normalization(f64::from(skill.domain_diversity), MAX_DOMAINS);

    round2((structural + diversity) / 2.0 * 100.0)
}

pub fn compute_experience_score(signals: Option<&ExperienceSignals>) -> f64 {
    let Some(signals) = signals else {
        return 0.0;
    };

    let score = normalization(f64::from(signals.years_experience), MAX_YEARS) * YEARS_WEIGHT
        + normalization(f64::from(signals.impact_mentions), MAX_IMPACT) * IMPACT_WEIGHT
        + normalization(f64::from(signals.leadership_mentions), MAX_LEADERSHIP)
            * LEADERSHIP_WEIGHT
        + normalization(f64::from(signals.deployment_mentions), MAX_DEPLOYMENT)
            * DEPLOYMENT_WEIGHT;

    round2(score * 100.0)
}

pub fn evaluate_resume(
    skills: &SkillMatches,
    linguistic: Option<&LinguisticMetrics>,
    experience: Option<&ExperienceSignals>,
) -> EvaluationResult {
    let skill_metrics = evaluate_skill(skills);

    EvaluationResult {
        rule_score: compute_rule_score(&skill_metrics, linguistic),
        confidence: compute_confidence(&skill_metrics),
        experience_score: compute_experience_score(experience),
        skill_metrics,
    }
}
