//! JD Matcher — set comparison between resume and job-description skill maps.

use serde_json::Value;

use crate::analysis::evaluator::round2;
use crate::errors::EngineError;
use crate::models::{MatchResult, SkillMatches};

/// Compares canonical skill names only; categories and counts are ignored.
pub fn compute_jd_match(resume: &SkillMatches, jd: &SkillMatches) -> MatchResult {
    let resume_set = resume.canonical_set();
    let jd_set = jd.canonical_set();

    if jd_set.is_empty() {
        return MatchResult {
            matched_skills: vec![],
            missing_skills: vec![],
            extra_skills: resume_set.into_iter().collect(),
            total_required: 0,
            total_matched: 0,
            match_percentage: 0.0,
        };
    }

    // BTreeSet iteration is already sorted
    let matched: Vec<String> = resume_set.intersection(&jd_set).cloned().collect();
    let missing: Vec<String> = jd_set.difference(&resume_set).cloned().collect();
    let extra: Vec<String> = resume_set.difference(&jd_set).cloned().collect();

    let percentage = matched.len() as f64 / jd_set.len() as f64 * 100.0;

    MatchResult {
        total_required: jd_set.len(),
        total_matched: matched.len(),
        match_percentage: round2(percentage),
        matched_skills: matched,
        missing_skills: missing,
        extra_skills: extra,
    }
}

/// Same as [`compute_jd_match`] for untyped input; malformed maps fail with `InputValidation`.
pub fn compute_jd_match_value(resume: &Value, jd: &Value) -> Result<MatchResult, EngineError> {
    let resume = SkillMatches::from_value(resume)?;
    let jd = SkillMatches::from_value(jd)?;
    Ok(compute_jd_match(&resume, &jd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_scenario() {
        let resume = json!({"programming": {"python": 3}, "databases": {"postgresql": 1}});
        let jd = json!({"programming": {"python": 1, "go": 1}, "cloud_devops": {"kubernetes": 1}});
        let result = compute_jd_match_value(&resume, &jd).unwrap();

        assert_eq!(result.matched_skills, vec!["python"]);
        assert_eq!(result.missing_skills, vec!["go", "kubernetes"]);
        assert_eq!(result.extra_skills, vec!["postgresql"]);
        assert_eq!(result.total_required, 3);
        assert_eq!(result.total_matched, 1);
        assert_eq!(result.match_percentage, 33.33);
    }

    #[test]
    fn test_empty_jd() {
        let resume = json!({"tools": {"git": 1, "docker": 2}});
        let result = compute_jd_match_value(&resume, &json!({})).unwrap();
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.extra_skills, vec!["docker", "git"]);
        assert_eq!(result.total_required, 0);
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_categories_are_ignored() {
        let resume = json!({"web": {"react": 1}});
        let jd = json!({"frontend": {"react": 5}});
        let result = compute_jd_match_value(&resume, &jd).unwrap();
        assert_eq!(result.match_percentage, 100.0);
    }

    #[test]
    fn test_partition_invariants() {
        let resume = json!({"a": {"x": 1, "y": 1, "z": 1}});
        let jd = json!({"b": {"y": 1, "w": 1}});
        let result = compute_jd_match_value(&resume, &jd).unwrap();
        assert_eq!(
            result.matched_skills.len() + result.missing_skills.len(),
            result.total_required
        );
        assert_eq!(result.matched_skills.len() + result.extra_skills.len(), 3);
        assert_eq!(result.match_percentage, 50.0);
    }

    #[test]
    fn test_rejects_non_mapping_input() {
        let err = compute_jd_match_value(&json!(["python"]), &json!({})).unwrap_err();
        assert!(err.is_input_validation());
        let err = compute_jd_match_value(&json!({}), &json!({"programming": ["python"]}))
            .unwrap_err();
        assert!(err.is_input_validation());
    }
}
