use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::nlp::{Annotator, HttpAnnotator, RuleAnnotator};
use crate::semantic::{HttpEmbedderLoader, LazyModel, SemanticScorer};
use crate::taxonomy::SkillTaxonomy;

/// Builds the shared analyzer from configuration.
///
/// - Annotator: `HttpAnnotator` when `ANNOTATOR_URL` is set, otherwise the offline `RuleAnnotator`.
/// - Semantic scorer: only when `EMBEDDING_URL` is set. The model itself loads on first use.
pub fn build_analyzer(config: &Config) -> Result<ResumeAnalyzer> {
    let taxonomy = SkillTaxonomy::load_or_builtin(config.taxonomy_path.as_deref())
        .context("failed to load skill taxonomy")?;
    info!(
        categories = taxonomy.categories().len(),
        skills = taxonomy.skill_count(),
        "skill taxonomy ready"
    );

    let timeout = Duration::from_secs(config.http_timeout_secs);

    let annotator: Arc<dyn Annotator> = match &config.annotator_url {
        Some(url) => {
            let annotator =
                HttpAnnotator::new(url, timeout).context("failed to build HTTP annotator")?;
            info!(endpoint = annotator.endpoint(), "using HTTP annotator");
            Arc::new(annotator)
        }
        None => {
            info!("using offline rule-based annotator");
            Arc::new(RuleAnnotator::new())
        }
    };

    let mut analyzer = ResumeAnalyzer::new(Arc::new(taxonomy), annotator)
        .with_chunk_max_chars(config.chunk_max_chars);

    if let Some(url) = &config.embedding_url {
        let loader = HttpEmbedderLoader {
            base_url: url.clone(),
            model: config.embedding_model.clone(),
            api_key: config.embedding_api_key.clone(),
            timeout,
        };
        let scorer = SemanticScorer::new(LazyModel::new(loader));
        analyzer = analyzer.with_semantic_scorer(Arc::new(scorer));
        info!(model = %config.embedding_model, "semantic scoring available");
    }

    Ok(analyzer)
}
