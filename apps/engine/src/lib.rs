//! Resume scoring engine: extracts text from PDF/DOCX resumes, finds skills against a taxonomy,
//! mines experience signals and fuses rule, semantic and experience scores into one result.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod nlp;
pub mod semantic;
pub mod state;
pub mod taxonomy;

pub use analysis::{AnalysisOptions, ResumeAnalyzer};
pub use errors::{EngineError, ErrorEnvelope};
