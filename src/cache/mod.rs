//! Embedding cache (exact LRU tier plus semantic FIFO tier) and embedders.
//!
//! A cache miss is never an error: callers compute the embedding and [`EmbeddingCache::put`]
//! it. [`CachedEmbedder`] does that for any [`Embedder`], and consults the semantic tier so
//! near-duplicate texts share one vector.

pub mod config;
pub mod embedder;
pub mod embedding;
pub mod error;
pub mod similarity;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use config::CacheConfig;
pub use embedder::{CachedEmbedder, Embedder, HttpEmbedder};
pub use embedding::{EmbeddingCache, EmbeddingCacheHandle};
pub use error::{CacheError, EmbeddingError, EmbeddingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use similarity::{cosine_similarity, normalize};
pub use types::{CacheStats, SemanticMatch};
