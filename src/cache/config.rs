use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_SECS, DEFAULT_SEMANTIC_CACHE_SIZE,
    DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
};

use super::error::CacheError;

/// Sizing and expiry for an [`super::EmbeddingCache`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Max entries in the exact tier (LRU). Default: `10_000`.
    pub max_cache_size: usize,
    /// Max entries in the semantic tier (FIFO). Default: `1_000`.
    pub semantic_cache_size: usize,
    /// Entry lifetime, checked on read. Default: one hour.
    pub ttl: Duration,
    /// Minimum cosine similarity for a semantic hit. Default: `0.95`.
    pub similarity_threshold: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_CACHE_SIZE,
            semantic_cache_size: DEFAULT_SEMANTIC_CACHE_SIZE,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            similarity_threshold: DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.max_cache_size == 0 {
            return Err(CacheError::InvalidConfig {
                reason: "max_cache_size must be greater than zero".to_string(),
            });
        }
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfig {
                reason: "ttl must be greater than zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CacheError::InvalidConfig {
                reason: format!(
                    "similarity_threshold must be between 0.0 and 1.0, got {}",
                    self.similarity_threshold
                ),
            });
        }
        Ok(())
    }
}
