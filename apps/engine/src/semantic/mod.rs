//! Semantic Scorer — embedding similarity between resume chunks and JD requirements.
//!
//! The embedding model is an expensive, process-wide resource. `LazyModel` builds it through a
//! `ModelLoader` on first use (at most once, even under concurrent first callers) and hands out a
//! shared `Arc` afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::analysis::evaluator::round2;
use crate::errors::EngineError;

pub mod http;

pub use http::{HttpEmbedder, HttpEmbedderLoader};

pub const DEFAULT_MODEL_NAME: &str = "sentence-transformers/all-mpnet-base-v2";

// ────────────────────────────────────────────────────────────────────────────
// Trait definitions
// ────────────────────────────────────────────────────────────────────────────

/// Maps texts to dense vectors, one per input, in input order.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError>;
}

/// Builds the embedding model. Invoked at most once per `LazyModel`.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EngineError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Lazy holder
// ────────────────────────────────────────────────────────────────────────────

pub struct LazyModel {
    loader: Box<dyn ModelLoader>,
    cell: OnceCell<Arc<dyn EmbeddingModel>>,
}

impl LazyModel {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            cell: OnceCell::new(),
        }
    }

    /// Returns the model, loading it on first call. A failed load leaves the cell empty so a
    /// later call can try again.
    pub async fn get(&self) -> Result<Arc<dyn EmbeddingModel>, EngineError> {
        let model = self
            .cell
            .get_or_try_init(|| async {
                info!("loading embedding model");
                self.loader.load().await
            })
            .await?;
        Ok(Arc::clone(model))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

pub struct SemanticScorer {
    model: LazyModel,
}

impl SemanticScorer {
    pub fn new(model: LazyModel) -> Self {
        Self { model }
    }

    /// Embeds and L2-normalizes `texts`. All vectors must share one dimension.
    pub async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        if texts.is_empty() {
            return Err(EngineError::InputValidation(
                "Input texts must not be empty.".to_string(),
            ));
        }

        let model = self.model.get().await?;
        let vectors = model.embed(texts).await?;

        if vectors.len() != texts.len() {
            return Err(EngineError::Embedding(format!(
                "model returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        let dim = vectors.first().map_or(0, Vec::len);
        if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
            return Err(EngineError::Embedding(
                "model returned empty or ragged embeddings".to_string(),
            ));
        }

        Ok(vectors.into_iter().map(l2_normalize).collect())
    }

    /// For each JD requirement, the best cosine similarity against any resume chunk, rescaled
    /// from [-1, 1] to [0, 1]; the mean of those × 100. 0.0 when either side is empty.
    pub async fn compute_semantic_score(
        &self,
        resume_chunks: &[String],
        jd_requirements: &[String],
    ) -> Result<f64, EngineError> {
        if resume_chunks.is_empty() || jd_requirements.is_empty() {
            return Ok(0.0);
        }

        let resume = self.encode(resume_chunks).await?;
        let jd = self.encode(jd_requirements).await?;

        let best: Vec<f64> = jd
            .iter()
            .map(|requirement| {
                resume
                    .iter()
                    .map(|chunk| f64::from(dot(requirement, chunk)))
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .map(|sim| ((sim + 1.0) / 2.0).clamp(0.0, 1.0))
            .collect();

        let mean = best.iter().sum::<f64>() / best.len() as f64;
        debug!(
            chunks = resume_chunks.len(),
            requirements = jd_requirements.len(),
            mean,
            "semantic similarity computed"
        );
        Ok(round2(mean * 100.0))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scales to unit length; zero vectors are returned unchanged.
fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
