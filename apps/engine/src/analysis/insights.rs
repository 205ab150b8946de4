//! Profile insights derived from a finished analysis.

use crate::models::{ExperienceLevel, ProfileSummary, SkillMatches};

const STRONG_DOMAIN_LIMIT: usize = 2;

pub fn experience_level(experience_score: f64) -> ExperienceLevel {
    if experience_score < 20.0 {
        ExperienceLevel::Fresher
    } else if experience_score < 50.0 {
        ExperienceLevel::Junior
    } else if experience_score < 75.0 {
        ExperienceLevel::Mid
    } else {
        ExperienceLevel::Senior
    }
}

/// Up to two categories with the most total mentions. Ties keep taxonomy order.
pub fn strong_domains(skills: &SkillMatches) -> Vec<String> {
    let mut totals: Vec<(&String, u64)> = skills
        .iter()
        .map(|(category, found)| (category, found.values().map(|&c| u64::from(c)).sum()))
        .collect();
    // stable sort keeps insertion order among equals
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    totals
        .into_iter()
        .take(STRONG_DOMAIN_LIMIT)
        .map(|(category, _)| category.clone())
        .collect()
}

pub fn build_profile(skills: &SkillMatches, experience_score: f64) -> ProfileSummary {
    ProfileSummary {
        experience_level: experience_level(experience_score),
        strong_domains: strong_domains(skills),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_experience_level_cutoffs() {
        assert_eq!(experience_level(0.0), ExperienceLevel::Fresher);
        assert_eq!(experience_level(19.99), ExperienceLevel::Fresher);
        assert_eq!(experience_level(20.0), ExperienceLevel::Junior);
        assert_eq!(experience_level(50.0), ExperienceLevel::Mid);
        assert_eq!(experience_level(74.99), ExperienceLevel::Mid);
        assert_eq!(experience_level(75.0), ExperienceLevel::Senior);
    }

    #[test]
    fn test_strong_domains_by_mentions_with_stable_ties() {
        let skills = SkillMatches::from_value(&json!({
            "programming": {"python": 2},
            "databases": {"redis": 1, "postgresql": 3},
            "tools": {"git": 2}
        }))
        .unwrap();
        assert_eq!(strong_domains(&skills), vec!["databases", "programming"]);
    }

    #[test]
    fn test_strong_domains_of_empty_skills() {
        assert!(strong_domains(&SkillMatches::new()).is_empty());
    }
}
