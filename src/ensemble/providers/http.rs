use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::candidate::Candidate;
use crate::ensemble::error::ProviderError;
use crate::ensemble::provider::ScoringProvider;

const DEFAULT_RERANK_TIMEOUT: Duration = Duration::from_secs(10);

/// Cross-encoder served over HTTP.
///
/// Sends `POST {url}` with `{"query": .., "texts": [..]}` and expects
/// `[{"index": i, "score": s}, ..]`, one entry per text in any order.
pub struct HttpRerankProvider {
    name: String,
    url: String,
    http: HttpClient,
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    texts: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RerankItem {
    index: usize,
    score: f32,
}

impl HttpRerankProvider {
    pub const DEFAULT_NAME: &'static str = "cross_encoder";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            url: url.into(),
            http: HttpClient::builder()
                .timeout(DEFAULT_RERANK_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Maps a response body onto candidate order.
    pub(crate) fn decode_scores(&self, expected: usize, body: &str) -> Result<Vec<f32>, ProviderError> {
        let items: Vec<RerankItem> =
            serde_json::from_str(body).map_err(|e| ProviderError::RequestFailed {
                provider: self.name.clone(),
                reason: format!("invalid response body: {e}"),
            })?;

        if items.len() != expected {
            return Err(ProviderError::LengthMismatch {
                provider: self.name.clone(),
                expected,
                actual: items.len(),
            });
        }

        let mut scores: Vec<Option<f32>> = vec![None; expected];
        for item in items {
            let slot = match scores.get_mut(item.index) {
                Some(slot) if slot.is_none() => slot,
                _ => {
                    return Err(ProviderError::Failed {
                        provider: self.name.clone(),
                        reason: format!("invalid or repeated index {}", item.index),
                    });
                }
            };
            *slot = Some(item.score);
        }

        Ok(scores.into_iter().map(|s| s.unwrap_or(0.0)).collect())
    }
}

#[async_trait]
impl ScoringProvider for HttpRerankProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, query, candidates), fields(provider = %self.name, num_candidates = candidates.len()))]
    async fn score(&self, query: &str, candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let request = RerankRequest {
            query,
            texts: candidates.iter().map(|c| c.content.as_str()).collect(),
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: self.name.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(ProviderError::RequestFailed {
                provider: self.name.clone(),
                reason: format!("status {}", resp.status()),
            });
        }

        let body = resp.text().await.map_err(|e| ProviderError::RequestFailed {
            provider: self.name.clone(),
            reason: e.to_string(),
        })?;

        self.decode_scores(candidates.len(), &body)
    }
}

impl std::fmt::Debug for HttpRerankProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRerankProvider")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish()
    }
}
