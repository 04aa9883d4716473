//! Embedding backends and the caching wrapper around them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::embedding::EmbeddingCacheHandle;
use super::error::{EmbeddingError, EmbeddingResult};

const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
/// Turns texts into dense vectors.
pub trait Embedder: Send + Sync {
    /// Model identifier, for logs.
    fn model_name(&self) -> &str;

    /// Embeds `texts`, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embeds a single text.
    async fn embed_one(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| EmbeddingError::InvalidResponse {
            reason: "embedder returned no vector".to_string(),
        })
    }
}

/// [`Embedder`] that consults an [`EmbeddingCacheHandle`] before delegating.
///
/// Exact hits are served from the cache; the remaining texts are embedded in one batch
/// and written back. A fresh vector within the cache's `similarity_threshold` of one already
/// in the semantic tier is replaced by that cached vector, so near-duplicate texts (case or
/// whitespace variants of a query or chunk) score identically downstream.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: EmbeddingCacheHandle,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, cache: EmbeddingCacheHandle) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &EmbeddingCacheHandle {
        &self.cache
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    #[instrument(skip(self, texts), fields(num_texts = texts.len()))]
    async fn embed(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut missing: Vec<String> = Vec::new();
        let mut missing_indices: Vec<usize> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            match self.cache.get(text) {
                Some(vector) => results.push(Some(vector)),
                None => {
                    results.push(None);
                    missing.push(text.clone());
                    missing_indices.push(i);
                }
            }
        }

        if !missing.is_empty() {
            debug!(
                cached = texts.len() - missing.len(),
                missing = missing.len(),
                "Embedding uncached texts"
            );

            let computed = self.inner.embed(&missing).await?;
            if computed.len() != missing.len() {
                return Err(EmbeddingError::InvalidResponse {
                    reason: format!(
                        "expected {} embeddings, got {}",
                        missing.len(),
                        computed.len()
                    ),
                });
            }

            for ((idx, text), vector) in missing_indices.into_iter().zip(&missing).zip(computed) {
                let vector = match self.cache.find_semantic_match(&vector) {
                    Some(found) => {
                        debug!(
                            similarity = found.similarity,
                            matched = %found.text,
                            "Reusing near-duplicate embedding"
                        );
                        found.embedding
                    }
                    None => vector,
                };
                self.cache.put(text, vector.clone());
                results[idx] = Some(vector);
            }
        }

        results
            .into_iter()
            .map(|r| {
                r.ok_or_else(|| EmbeddingError::InvalidResponse {
                    reason: "missing embedding after cache fill".to_string(),
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for CachedEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("model", &self.inner.model_name())
            .field("cache", &self.cache)
            .finish()
    }
}

/// Client for OpenAI-compatible `POST {base_url}/embeddings` endpoints.
pub struct HttpEmbedder {
    http: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimension: Option<usize>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> EmbeddingResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "base_url must not be empty".to_string(),
            });
        }

        let http = HttpClient::builder()
            .timeout(DEFAULT_EMBED_TIMEOUT)
            .build()
            .unwrap_or_else(|_| HttpClient::new());

        Ok(Self {
            http,
            base_url,
            model: model.into(),
            api_key: None,
            dimension: None,
        })
    }

    /// Sends `Authorization: Bearer {api_key}` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Rejects responses whose vectors do not have `dimension` entries.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    /// Parses an `/embeddings` response body into vectors in request order.
    pub(crate) fn decode_response(&self, expected: usize, body: &str) -> EmbeddingResult<Vec<Vec<f32>>> {
        let parsed: EmbeddingResponse =
            serde_json::from_str(body).map_err(|e| EmbeddingError::InvalidResponse {
                reason: e.to_string(),
            })?;
        self.order_response(expected, parsed.data)
    }

    fn order_response(&self, expected: usize, mut data: Vec<EmbeddingDatum>) -> EmbeddingResult<Vec<Vec<f32>>> {
        if data.len() != expected {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("expected {} embeddings, got {}", expected, data.len()),
            });
        }

        data.sort_by_key(|d| d.index);
        for (position, datum) in data.iter().enumerate() {
            if datum.index != position {
                return Err(EmbeddingError::InvalidResponse {
                    reason: format!("unexpected embedding index {}", datum.index),
                });
            }
            if let Some(expected_dim) = self.dimension
                && datum.embedding.len() != expected_dim
            {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: expected_dim,
                    actual: datum.embedding.len(),
                });
            }
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, texts), fields(model = %self.model, num_texts = texts.len()))]
    async fn embed(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.http.post(self.endpoint()).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        self.decode_response(texts.len(), &body)
    }
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("dimension", &self.dimension)
            .finish()
    }
}
