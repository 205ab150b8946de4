//! Skill Taxonomy — the read-only category → canonical skill → variants table.
//!
//! Loaded once per process (built-in asset or `SKILL_TAXONOMY_PATH`) and shared behind `Arc`.
//! Variant normal forms are computed at load time so extraction never re-normalizes them.

use std::path::Path;

use indexmap::IndexMap;
use tracing::info;

use crate::analysis::text::{collapse_spaces, normalize_phrase_text, normalize_skill_text};
use crate::errors::EngineError;

/// The taxonomy as it appears on disk: category → canonical → ordered variants.
pub type RawTaxonomy = IndexMap<String, IndexMap<String, Vec<String>>>;

const BUILTIN_TAXONOMY: &str = include_str!("../../assets/skills.json");

/// One surface form of a canonical skill, pre-normalized for both extraction strategies.
#[derive(Debug, Clone)]
pub struct Variant {
    pub raw: String,
    /// Primary extractor form (`normalize_skill_text`).
    pub normalized: String,
    /// `normalized` with spaces removed.
    pub collapsed: String,
    /// Fallback extractor form (`normalize_phrase_text`).
    pub phrase: String,
}

impl Variant {
    fn new(raw: &str) -> Self {
        let normalized = normalize_skill_text(raw);
        let collapsed = collapse_spaces(&normalized);
        Self {
            raw: raw.to_string(),
            normalized,
            collapsed,
            phrase: normalize_phrase_text(raw.trim()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CanonicalSkill {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl CanonicalSkill {
    /// The canonical identifier as a phrase: `machine_learning` → `machine learning`.
    pub fn phrase(&self) -> String {
        self.name.replace('_', " ")
    }
}

#[derive(Debug, Clone)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<CanonicalSkill>,
}

/// Immutable, order-preserving skill taxonomy.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    categories: Vec<SkillCategory>,
}

impl SkillTaxonomy {
    pub fn from_raw(raw: RawTaxonomy) -> Self {
        let categories = raw
            .into_iter()
            .map(|(category, skills)| SkillCategory {
                name: category,
                skills: skills
                    .into_iter()
                    .map(|(canonical, variants)| CanonicalSkill {
                        name: canonical,
                        variants: variants.iter().map(|v| Variant::new(v)).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let raw: RawTaxonomy = serde_json::from_str(json)
            .map_err(|e| EngineError::Taxonomy(format!("invalid taxonomy JSON: {e}")))?;
        Ok(Self::from_raw(raw))
    }

    /// The taxonomy compiled into the binary.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_json_str(BUILTIN_TAXONOMY)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Taxonomy(format!("cannot read taxonomy {}: {e}", path.display()))
        })?;
        let taxonomy = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            categories = taxonomy.categories.len(),
            skills = taxonomy.skill_count(),
            "loaded skill taxonomy"
        );
        Ok(taxonomy)
    }

    /// Loads from `path` when given, otherwise falls back to the built-in asset.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    pub fn skill_count(&self) -> usize {
        self.categories.iter().map(|c| c.skills.len()).sum()
    }
}
