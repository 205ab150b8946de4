/// HttpAnnotator — calls an external spaCy-style annotation service.
///
/// Contract: `POST {base_url}/annotate` with `{"text": "..."}` returns an `Annotation` document.
/// One attempt per call; failures surface as `EngineError::Annotation`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{Annotation, Annotator};
use crate::errors::EngineError;

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

#[derive(Clone)]
pub struct HttpAnnotator {
    client: Client,
    endpoint: String,
}

impl HttpAnnotator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build annotator HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/annotate", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Annotator for HttpAnnotator {
    async fn annotate(&self, text: &str) -> Result<Annotation, EngineError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnnotateRequest { text })
            .send()
            .await
            .map_err(|e| EngineError::Annotation(format!("annotator request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Annotation(format!(
                "annotator returned {status}: {body}"
            )));
        }

        let annotation: Annotation = response
            .json()
            .await
            .map_err(|e| EngineError::Annotation(format!("invalid annotator response: {e}")))?;

        debug!(
            tokens = annotation.tokens.len(),
            entities = annotation.entities.len(),
            noun_chunks = annotation.noun_chunks.len(),
            "annotation received"
        );
        Ok(annotation)
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}
