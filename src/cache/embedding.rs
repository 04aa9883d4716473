//! Two-tier embedding cache.
//!
//! The exact tier is keyed by the BLAKE3 hash of the text and evicts least-recently-used
//! entries. The semantic tier keeps the most recent inserts in arrival order and answers
//! nearest-neighbour lookups by cosine similarity. Both tiers share one lock; lookups copy
//! the embedding out so no reference outlives the guard.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::config::CacheConfig;
use super::error::CacheError;
use super::similarity::cosine_similarity;
use super::types::{CacheStats, SemanticMatch};
use crate::hashing::hash_text;

struct ExactEntry {
    embedding: Vec<f32>,
    inserted_at: Instant,
}

struct SemanticEntry {
    key: [u8; 32],
    text: String,
    embedding: Vec<f32>,
    inserted_at: Instant,
}

#[inline]
fn is_expired(inserted_at: Instant, ttl: Duration, now: Instant) -> bool {
    now.saturating_duration_since(inserted_at) > ttl
}

struct CacheState {
    exact: LruCache<[u8; 32], ExactEntry>,
    semantic: VecDeque<SemanticEntry>,
    stats: CacheStats,
}

/// In-memory embedding cache with an exact (LRU) and a semantic (FIFO) tier.
pub struct EmbeddingCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl EmbeddingCache {
    /// Creates a cache after validating `config`.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                exact: LruCache::new(capacity),
                semantic: VecDeque::with_capacity(config.semantic_cache_size.min(1024)),
                stats: CacheStats::default(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Exact lookup. Expired entries are removed and reported as a miss; a hit promotes
    /// the entry to most-recently-used.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let key = hash_text(text);
        let now = Instant::now();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let expired = match state.exact.peek(&key) {
            Some(entry) => is_expired(entry.inserted_at, self.config.ttl, now),
            None => {
                state.stats.misses += 1;
                return None;
            }
        };

        if expired {
            state.exact.pop(&key);
            state.stats.expirations += 1;
            state.stats.misses += 1;
            trace!("Exact cache entry expired");
            return None;
        }

        state.stats.hits += 1;
        state.exact.get(&key).map(|entry| entry.embedding.clone())
    }

    /// Stores `embedding` under `text` in both tiers.
    ///
    /// Re-inserting a known text refreshes its TTL and moves it to the back of the
    /// semantic queue.
    pub fn put(&self, text: &str, embedding: Vec<f32>) {
        let key = hash_text(text);
        let now = Instant::now();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let displaced = state.exact.push(
            key,
            ExactEntry {
                embedding: embedding.clone(),
                inserted_at: now,
            },
        );
        if let Some((evicted_key, _)) = displaced
            && evicted_key != key
        {
            state.stats.evictions += 1;
        }

        if self.config.semantic_cache_size == 0 {
            return;
        }

        if let Some(pos) = state.semantic.iter().position(|e| e.key == key) {
            state.semantic.remove(pos);
        }
        state.semantic.push_back(SemanticEntry {
            key,
            text: text.to_string(),
            embedding,
            inserted_at: now,
        });
        while state.semantic.len() > self.config.semantic_cache_size {
            state.semantic.pop_front();
            state.stats.evictions += 1;
        }
    }

    /// Most similar live semantic entry, if its similarity reaches the configured threshold.
    pub fn find_semantic_match(&self, embedding: &[f32]) -> Option<SemanticMatch> {
        let now = Instant::now();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let best = state
            .semantic
            .iter()
            .filter(|e| !is_expired(e.inserted_at, self.config.ttl, now))
            .map(|e| (e, cosine_similarity(embedding, &e.embedding)))
            .filter(|(_, similarity)| *similarity >= self.config.similarity_threshold)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(e, similarity)| SemanticMatch {
                text: e.text.clone(),
                embedding: e.embedding.clone(),
                similarity,
            });

        match &best {
            Some(found) => {
                state.stats.semantic_hits += 1;
                debug!(similarity = found.similarity, "Semantic cache hit");
            }
            None => state.stats.semantic_misses += 1,
        }

        best
    }

    /// Drops every expired entry from both tiers and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.config.ttl;
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let expired_keys: Vec<[u8; 32]> = state
            .exact
            .iter()
            .filter(|(_, entry)| is_expired(entry.inserted_at, ttl, now))
            .map(|(key, _)| *key)
            .collect();
        for key in &expired_keys {
            state.exact.pop(key);
        }

        let before = state.semantic.len();
        state
            .semantic
            .retain(|e| !is_expired(e.inserted_at, ttl, now));
        let removed = expired_keys.len() + (before - state.semantic.len());

        state.stats.expirations += removed as u64;
        if removed > 0 {
            debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    /// Empties both tiers. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.exact.clear();
        state.semantic.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            exact_entries: state.exact.len(),
            semantic_entries: state.semantic.len(),
            ..state.stats
        }
    }

    /// Number of exact-tier entries.
    pub fn len(&self) -> usize {
        self.state.lock().exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `text` has a live exact entry. Does not touch LRU order or stats.
    pub fn contains(&self, text: &str) -> bool {
        let key = hash_text(text);
        let state = self.state.lock();
        state
            .exact
            .peek(&key)
            .is_some_and(|e| !is_expired(e.inserted_at, self.config.ttl, Instant::now()))
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::build(CacheConfig::default())
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EmbeddingCache")
            .field("exact_entries", &state.exact.len())
            .field("semantic_entries", &state.semantic.len())
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Clone)]
/// Shared handle to an [`EmbeddingCache`].
pub struct EmbeddingCacheHandle {
    inner: Arc<EmbeddingCache>,
}

impl EmbeddingCacheHandle {
    /// Creates a handle around a new cache built from `config`.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        Ok(Self {
            inner: Arc::new(EmbeddingCache::new(config)?),
        })
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: EmbeddingCache) -> Self {
        Self {
            inner: Arc::new(cache),
        }
    }

    #[inline]
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.inner.get(text)
    }

    #[inline]
    pub fn put(&self, text: &str, embedding: Vec<f32>) {
        self.inner.put(text, embedding)
    }

    #[inline]
    pub fn find_semantic_match(&self, embedding: &[f32]) -> Option<SemanticMatch> {
        self.inner.find_semantic_match(embedding)
    }

    #[inline]
    pub fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }

    #[inline]
    pub fn clear(&self) {
        self.inner.clear()
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn contains(&self, text: &str) -> bool {
        self.inner.contains(text)
    }

    /// Returns the number of strong references to the underlying cache.
    #[inline]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl Default for EmbeddingCacheHandle {
    fn default() -> Self {
        Self::from_cache(EmbeddingCache::default())
    }
}

impl std::fmt::Debug for EmbeddingCacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCacheHandle")
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
