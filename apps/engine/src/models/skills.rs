use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EngineError;

/// Canonical skill name → mention count (always ≥ 1).
pub type SkillCounts = IndexMap<String, u32>;

/// Category → canonical skill → mention count.
///
/// Categories keep taxonomy order and are never stored empty. Deserialization goes through
/// `TryFrom<RawSkillMatches>`, so stored results obey the same rules as extracted ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSkillMatches", into = "RawSkillMatches")]
pub struct SkillMatches(IndexMap<String, SkillCounts>);

type RawSkillMatches = IndexMap<String, SkillCounts>;

impl SkillMatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Records a category's matches. Empty maps are dropped.
    pub fn insert_category(&mut self, category: impl Into<String>, skills: SkillCounts) {
        if !skills.is_empty() {
            self.0.insert(category.into(), skills);
        }
    }

    pub fn get(&self, category: &str) -> Option<&SkillCounts> {
        self.0.get(category)
    }

    pub fn count(&self, category: &str, skill: &str) -> Option<u32> {
        self.0.get(category).and_then(|skills| skills.get(skill)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SkillCounts)> {
        self.0.iter()
    }

    /// Flattens to the set of canonical names, discarding categories.
    pub fn canonical_set(&self) -> BTreeSet<String> {
        self.0
            .values()
            .flat_map(|skills| skills.keys().cloned())
            .collect()
    }

    /// Additive-only merge: new categories come in wholesale, existing categories only gain
    /// canonical skills they did not already have. Existing counts are never overwritten.
    pub fn merge_additive(&mut self, other: SkillMatches) {
        for (category, skills) in other.0 {
            match self.0.get_mut(&category) {
                Some(existing) => {
                    for (skill, count) in skills {
                        existing.entry(skill).or_insert(count);
                    }
                }
                None => self.insert_category(category, skills),
            }
        }
    }

    /// Builds a typed skill map from untyped JSON, rejecting anything that is not a mapping of
    /// mappings of non-negative integer counts.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        let categories = value.as_object().ok_or_else(|| {
            EngineError::InputValidation("Skills must be a mapping of categories.".to_string())
        })?;

        let mut matches = SkillMatches::new();
        for (category, skills) in categories {
            let skills = skills.as_object().ok_or_else(|| {
                EngineError::InputValidation(format!(
                    "Skills for category '{category}' must be a mapping."
                ))
            })?;

            let mut counts = SkillCounts::new();
            for (skill, count) in skills {
                let count = count
                    .as_u64()
                    .and_then(|c| u32::try_from(c).ok())
                    .ok_or_else(|| {
                        EngineError::InputValidation(format!(
                            "Count for skill '{skill}' in '{category}' must be a non-negative integer."
                        ))
                    })?;
                counts.insert(skill.clone(), count);
            }
            matches.insert_category(category.clone(), counts);
        }
        Ok(matches)
    }
}

impl TryFrom<RawSkillMatches> for SkillMatches {
    type Error = EngineError;

    /// Drops empty categories and rejects zero counts.
    fn try_from(raw: RawSkillMatches) -> Result<Self, Self::Error> {
        let mut matches = SkillMatches::new();
        for (category, skills) in raw {
            if let Some(skill) = skills.iter().find(|(_, count)| **count == 0).map(|(s, _)| s) {
                return Err(EngineError::InputValidation(format!(
                    "Count for skill '{skill}' in '{category}' must be at least 1."
                )));
            }
            matches.insert_category(category, skills);
        }
        Ok(matches)
    }
}

impl From<SkillMatches> for RawSkillMatches {
    fn from(matches: SkillMatches) -> Self {
        matches.0
    }
}

impl FromIterator<(String, SkillCounts)> for SkillMatches {
    fn from_iter<I: IntoIterator<Item = (String, SkillCounts)>>(iter: I) -> Self {
        let mut matches = SkillMatches::new();
        for (category, skills) in iter {
            matches.insert_category(category, skills);
        }
        matches
    }
}
