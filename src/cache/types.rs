use serde::Serialize;

/// Counters for an [`super::EmbeddingCache`], copied out under the lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub semantic_hits: u64,
    pub semantic_misses: u64,
    /// Entries dropped to stay within capacity (both tiers).
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed (both tiers).
    pub expirations: u64,
    pub exact_entries: usize,
    pub semantic_entries: usize,
}

impl CacheStats {
    /// Exact-tier hit rate in `[0, 1]`; `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Best semantic-tier match for a query embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    /// Text the cached embedding was stored under.
    pub text: String,
    pub embedding: Vec<f32>,
    pub similarity: f32,
}
