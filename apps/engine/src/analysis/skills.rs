//! Primary Skill Extractor — exact phrase matching with a collapsed-token fallback.

use std::collections::HashSet;

use crate::analysis::text::{count_phrase_occurrences, normalize_skill_text};
use crate::models::{SectionMap, SkillCounts, SkillMatches};
use crate::taxonomy::{CanonicalSkill, SkillTaxonomy};

/// Collapsed variants this short are too ambiguous for token matching ("js", "ts", "aws").
const MIN_COLLAPSED_LEN: usize = 4;

/// Runs skill detection over the skill-bearing sections (skills, experience, projects).
pub fn extract_skills(sections: &SectionMap, taxonomy: &SkillTaxonomy) -> SkillMatches {
    extract_skills_from_text(&sections.skill_bearing_text(), taxonomy)
}

/// Runs skill detection over arbitrary text. Also used to derive a JD's skill set.
///
/// Per canonical skill:
/// 1. The first variant with a word-boundary phrase match scores its occurrence count
/// 2. Otherwise the first collapsed variant (length ≥ 4) equal to a collapsed token scores 1
pub fn extract_skills_from_text(text: &str, taxonomy: &SkillTaxonomy) -> SkillMatches {
    let soft_text = normalize_skill_text(text);
    if soft_text.is_empty() {
        return SkillMatches::new();
    }
    let tokens: HashSet<&str> = soft_text.split(' ').collect();

    taxonomy
        .categories()
        .iter()
        .map(|category| {
            let found: SkillCounts = category
                .skills
                .iter()
                .filter_map(|skill| {
                    let count = score_skill(skill, &soft_text, &tokens);
                    (count > 0).then(|| (skill.name.clone(), count))
                })
                .collect();
            (category.name.clone(), found)
        })
        .collect()
}

fn score_skill(skill: &CanonicalSkill, soft_text: &str, tokens: &HashSet<&str>) -> u32 {
    let phrase_hits = skill
        .variants
        .iter()
        .filter(|v| !v.normalized.is_empty())
        .map(|v| count_phrase_occurrences(soft_text, &v.normalized))
        .find(|&hits| hits > 0);

    if let Some(hits) = phrase_hits {
        return u32::try_from(hits).unwrap_or(u32::MAX);
    }

    let token_hit = skill
        .variants
        .iter()
        .filter(|v| v.collapsed.chars().count() >= MIN_COLLAPSED_LEN)
        .any(|v| tokens.contains(v.collapsed.as_str()));

    u32::from(token_hit)
}
