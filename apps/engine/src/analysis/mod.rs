// Resume analysis pipeline.
// Implements: chunking, section segmentation, skill extraction (primary + noun-phrase fallback),
// experience signals, rule evaluation, JD matching and the controller that fuses them.
// External capabilities (annotation, embeddings) are reached only through the nlp and semantic traits.

pub mod chunker;
pub mod controller;
pub mod evaluator;
pub mod experience;
pub mod fallback;
pub mod insights;
pub mod jd;
pub mod matcher;
pub mod sections;
pub mod skills;
pub mod text;

pub use controller::{fuse_scores, AnalysisOptions, ResumeAnalyzer, FALLBACK_THRESHOLD};
