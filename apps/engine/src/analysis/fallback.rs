//! Fallback Skill Extractor — recovers skills from noun-chunk lemmas when exact matching is sparse.

use std::collections::HashSet;

use crate::analysis::text::normalize_phrase_text;
use crate::errors::EngineError;
use crate::models::{SectionMap, SkillCounts, SkillMatches};
use crate::nlp::Annotator;
use crate::taxonomy::{CanonicalSkill, SkillTaxonomy};

/// Annotates the skill-bearing sections and matches canonical skills against noun-chunk lemma
/// phrases. Every match counts 1.
pub async fn extract_fallback_skills(
    sections: &SectionMap,
    taxonomy: &SkillTaxonomy,
    annotator: &dyn Annotator,
) -> Result<SkillMatches, EngineError> {
    let text = normalize_phrase_text(&sections.skill_bearing_text());
    if text.is_empty() {
        return Ok(SkillMatches::new());
    }

    let annotation = annotator.annotate(&text).await?;
    let phrases: HashSet<String> = annotation
        .noun_chunks
        .iter()
        .map(|chunk| chunk.lemma_phrase())
        .filter(|phrase| !phrase.is_empty())
        .collect();

    Ok(match_phrases(&phrases, taxonomy))
}

fn match_phrases(phrases: &HashSet<String>, taxonomy: &SkillTaxonomy) -> SkillMatches {
    taxonomy
        .categories()
        .iter()
        .map(|category| {
            let found: SkillCounts = category
                .skills
                .iter()
                .filter(|skill| skill_in_phrases(skill, phrases))
                .map(|skill| (skill.name.clone(), 1))
                .collect();
            (category.name.clone(), found)
        })
        .collect()
}

fn skill_in_phrases(skill: &CanonicalSkill, phrases: &HashSet<String>) -> bool {
    phrases.contains(&skill.phrase())
        || skill
            .variants
            .iter()
            .filter(|v| !v.phrase.is_empty())
            .any(|v| phrases.contains(&v.phrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::Section;
    use crate::nlp::{Annotation, NounChunk, RuleAnnotator};

    /// Returns fixed noun chunks and records the text it was given.
    struct StubAnnotator {
        chunks: Vec<Vec<&'static str>>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Annotator for StubAnnotator {
        async fn annotate(&self, text: &str) -> Result<Annotation, EngineError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(Annotation {
                noun_chunks: self
                    .chunks
                    .iter()
                    .map(|lemmas| NounChunk {
                        lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
                    })
                    .collect(),
                ..Default::default()
            })
        }

        fn backend(&self) -> &'static str {
            "stub"
        }
    }

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::from_json_str(
            r#"{
                "machine_learning": {"machine_learning": ["ml"], "deep_learning": ["deep learning"]},
                "cloud_devops": {"ci_cd": ["ci/cd"]}
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_matches_canonical_phrase_and_variants() {
        let annotator = StubAnnotator {
            chunks: vec![vec!["machine", "learning"], vec!["ci", "cd"], vec!["deep", "  learning"]],
            seen: Mutex::new(vec![]),
        };
        let mut sections = SectionMap::default();
        sections.append_line(Section::Experience, "Worked on Machine-Learning and CI/CD");

        let result = extract_fallback_skills(&sections, &taxonomy(), &annotator)
            .await
            .unwrap();

        assert_eq!(result.count("machine_learning", "machine_learning"), Some(1));
        assert_eq!(result.count("machine_learning", "deep_learning"), Some(1));
        assert_eq!(result.count("cloud_devops", "ci_cd"), Some(1));

        let seen = annotator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("machine learning and ci cd"));
    }

    #[tokio::test]
    async fn test_empty_sections_skip_annotation() {
        let annotator = StubAnnotator {
            chunks: vec![],
            seen: Mutex::new(vec![]),
        };
        let result = extract_fallback_skills(&SectionMap::default(), &taxonomy(), &annotator)
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(annotator.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_rule_annotator() {
        let mut sections = SectionMap::default();
        sections.append_line(Section::Projects, "Research on deep learning models.");
        let result = extract_fallback_skills(&sections, &taxonomy(), &RuleAnnotator::new())
            .await
            .unwrap();
        // "deep learning model" is one chunk, so no exact phrase match
        assert!(result.get("machine_learning").is_none());

        let mut sections = SectionMap::default();
        sections.append_line(Section::Skills, "deep learning, machine learning");
        let result = extract_fallback_skills(&sections, &taxonomy(), &RuleAnnotator::new())
            .await
            .unwrap();
        assert_eq!(result.get("machine_learning").map(|s| s.len()), Some(2));
    }
}
