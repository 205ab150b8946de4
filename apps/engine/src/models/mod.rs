// Typed data model shared by every pipeline stage.
// Nothing here is persisted by the engine; results are handed to the caller as JSON.

pub mod analysis;
pub mod sections;
pub mod skills;

pub use analysis::{
    EvaluationResult, ExperienceLevel, ExperienceSignals, FinalAnalysis, LinguisticMetrics,
    MatchResult, ProfileSummary, SkillMetrics,
};
pub use sections::{Section, SectionMap};
pub use skills::{SkillCounts, SkillMatches};
