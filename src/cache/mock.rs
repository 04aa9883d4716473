use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::embedder::Embedder;
use super::error::{EmbeddingError, EmbeddingResult};
use super::similarity::normalize;

/// Deterministic embedder for tests: each text maps to a unit vector derived from its
/// BLAKE3 hash, so equal texts embed identically and different texts almost never collide.
/// [`MockEmbedder::with_vector`] pins a text to a chosen vector.
#[derive(Debug)]
pub struct MockEmbedder {
    dimension: usize,
    pinned: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
    embedded_texts: AtomicUsize,
    fail: AtomicBool,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            pinned: HashMap::new(),
            calls: AtomicUsize::new(0),
            embedded_texts: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Makes `text` embed as `vector` instead of its hash-derived vector.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.into(), vector);
        self
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of `embed` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total number of texts embedded across all calls.
    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::SeqCst)
    }

    /// Makes subsequent calls fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Vector the mock produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(vector) = self.pinned.get(text) {
            return vector.clone();
        }
        let mut reader = blake3::Hasher::new()
            .update(text.as_bytes())
            .finalize_xof();
        let mut bytes = vec![0u8; self.dimension * 4];
        reader.fill(&mut bytes);

        let mut vector: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| {
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                (raw as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect();
        normalize(&mut vector);
        vector
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(32)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    async fn embed(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                reason: "mock embedder configured to fail".to_string(),
            });
        }
        self.embedded_texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
