use serde::Serialize;
use thiserror::Error;

/// Engine-level error type.
/// Every variant is terminal for the request that raised it; nothing in the core retries.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from '{path}': {source}")]
    Extraction {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    InputValidation(String),

    #[error("Chunking failed: {0}")]
    Chunking(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable machine-readable code, used in the serialized error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            EngineError::Extraction { .. } => "EXTRACTION_ERROR",
            EngineError::InputValidation(_) => "VALIDATION_ERROR",
            EngineError::Chunking(_) => "CHUNKING_ERROR",
            EngineError::EmptyInput(_) => "EMPTY_INPUT",
            EngineError::Annotation(_) => "ANNOTATION_ERROR",
            EngineError::Embedding(_) => "EMBEDDING_ERROR",
            EngineError::Taxonomy(_) => "TAXONOMY_ERROR",
            EngineError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Bad path, unsupported extension, or malformed caller-supplied arguments.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            EngineError::NotFound(_)
                | EngineError::UnsupportedFormat(_)
                | EngineError::InputValidation(_)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// The error marker handed to callers in place of an analysis:
/// `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl From<&EngineError> for ErrorEnvelope {
    fn from(err: &EngineError) -> Self {
        ErrorEnvelope {
            error: ErrorBody {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}
