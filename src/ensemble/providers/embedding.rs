use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{Embedder, cosine_similarity};
use crate::candidate::Candidate;
use crate::ensemble::error::ProviderError;
use crate::ensemble::provider::ScoringProvider;

/// Bi-encoder scorer: cosine similarity between query and candidate embeddings.
///
/// Cosine values are mapped from `[-1, 1]` to `[0, 1]`. Pair it with a
/// [`crate::cache::CachedEmbedder`] so repeated chunks are embedded once.
pub struct EmbeddingSimilarityProvider {
    name: String,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingSimilarityProvider {
    pub const DEFAULT_NAME: &'static str = "embedding";

    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            embedder,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn failure(&self, reason: impl ToString) -> ProviderError {
        ProviderError::Failed {
            provider: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl ScoringProvider for EmbeddingSimilarityProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, query: &str, candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed_one(query)
            .await
            .map_err(|e| self.failure(e))?;

        let texts: Vec<String> = candidates.iter().map(|c| c.content.clone()).collect();
        let vectors = self
            .embedder
            .embed(&texts)
            .await
            .map_err(|e| self.failure(e))?;

        Ok(vectors
            .iter()
            .map(|v| (cosine_similarity(&query_vector, v) + 1.0) / 2.0)
            .collect())
    }
}

impl std::fmt::Debug for EmbeddingSimilarityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingSimilarityProvider")
            .field("name", &self.name)
            .field("model", &self.embedder.model_name())
            .finish()
    }
}
