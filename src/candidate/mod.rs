//! Retrieved chunk under consideration for the final ranked context.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hashing::hash_candidate;

/// A retrieved text chunk.
///
/// `similarity_score` comes from upstream retrieval. `composite_score` and `rerank_score`
/// are filled in by later pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub content: String,
    pub source: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub similarity_score: f32,
    /// Retrieval strategy that produced this chunk (e.g. `"vector"`, `"neighbors"`).
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub composite_score: Option<f32>,
    #[serde(default)]
    pub rerank_score: Option<f32>,
}

impl Candidate {
    pub fn new(content: impl Into<String>, source: impl Into<String>, similarity_score: f32) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            metadata: HashMap::new(),
            similarity_score,
            method: None,
            composite_score: None,
            rerank_score: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Identity used for de-duplication when merging candidate sets.
    #[inline]
    pub fn identity(&self) -> u64 {
        hash_candidate(&self.source, &self.content)
    }
}

/// Sorts candidates by descending upstream similarity (stable for ties).
pub fn sort_by_similarity(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Mean upstream similarity of a candidate set; `0.0` when empty.
pub fn mean_similarity(candidates: &[Candidate]) -> f32 {
    if candidates.is_empty() {
        return 0.0;
    }
    candidates.iter().map(|c| c.similarity_score).sum::<f32>() / candidates.len() as f32
}
