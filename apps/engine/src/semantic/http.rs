//! OpenAI-compatible embeddings client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{EmbeddingModel, ModelLoader};
use crate::errors::EngineError;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

/// Talks to `POST {base_url}/embeddings`. One attempt per call.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

impl HttpEmbedder {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        if model.trim().is_empty() {
            return Err(EngineError::Config("missing embedding model name".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            let auth = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| EngineError::Config("invalid embedding API key".to_string()))?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build embedding HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmbeddingModel for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::Embedding(format!("embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EngineError::Embedding(format!(
                "embeddings request failed ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Embedding(format!("failed to parse embedding response: {e}")))?;
        ordered_embeddings(parsed, texts.len())
    }
}

/// Puts entries back in input order and checks one came back per input.
fn ordered_embeddings(
    mut parsed: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EngineError> {
    parsed.data.sort_by_key(|entry| entry.index);

    if parsed.data.len() != expected {
        return Err(EngineError::Embedding(format!(
            "service returned {} embeddings for {} inputs",
            parsed.data.len(),
            expected
        )));
    }

    Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
}

/// Builds an `HttpEmbedder` on first use.
pub struct HttpEmbedderLoader {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[async_trait]
impl ModelLoader for HttpEmbedderLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingModel>, EngineError> {
        let embedder = HttpEmbedder::new(
            &self.base_url,
            &self.model,
            self.api_key.as_deref(),
            self.timeout,
        )?;
        info!(endpoint = embedder.endpoint(), model = %self.model, "embedding model ready");
        Ok(Arc::new(embedder))
    }
}
