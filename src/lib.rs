//! Ragsift library crate: the retrieval-quality core of a document QA pipeline.
//!
//! Given a query and the candidate chunks a vector store returned for it, ragsift decides
//! how strict retrieval should be, widens thin context, and fuses several relevance
//! scorers into one ranking.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`RetrievalPipeline`], [`RetrievalResponse`], [`RetrievalMetadata`] - End-to-end pass
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//!
//! ## Components
//! - [`QueryAnalyzer`], [`Query`], [`QueryType`], [`PatternTable`] - Query classification
//! - [`ThresholdManager`], [`AdaptiveThresholds`], [`select_candidates`] - Quality tiers
//! - [`EmbeddingCache`], [`EmbeddingCacheHandle`], [`CachedEmbedder`] - Embedding reuse
//! - [`EnsembleReranker`], [`ScoringProvider`], [`FusionStrategy`] - Score fusion
//! - [`ContextExpansionService`], [`CandidateSource`] - Context expansion
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod candidate;
pub mod config;
pub mod constants;
pub mod ensemble;
pub mod expansion;
pub mod hashing;
pub mod pipeline;
pub mod query;
pub mod thresholds;

#[cfg(any(test, feature = "mock"))]
pub use cache::MockEmbedder;
pub use cache::{
    CacheConfig, CacheError, CacheStats, CachedEmbedder, Embedder, EmbeddingCache,
    EmbeddingCacheHandle, EmbeddingError, EmbeddingResult, HttpEmbedder, SemanticMatch,
    cosine_similarity,
};

pub use candidate::{Candidate, mean_similarity, sort_by_similarity};
pub use config::{Config, ConfigError};

#[cfg(any(test, feature = "mock"))]
pub use ensemble::{FailingProvider, RawProvider, SlowProvider, StaticProvider};
pub use ensemble::{
    EmbeddingSimilarityProvider, EnsembleConfig, EnsembleDiagnostics, EnsembleError,
    EnsembleOutcome, EnsembleReranker, FusionStrategy, HttpRerankProvider, LexicalProvider,
    ProviderError, RerankOutcome, ScoringProvider,
};

#[cfg(any(test, feature = "mock"))]
pub use expansion::MockCandidateSource;
pub use expansion::{
    CandidateSource, ContextExpansionService, ExpansionError, ExpansionOutcome, ExpansionScope,
    ExpansionStrategy, FetchRequest,
};

pub use hashing::{hash_candidate, hash_text};
pub use pipeline::{PipelineError, RetrievalMetadata, RetrievalPipeline, RetrievalResponse};
pub use query::{PatternError, PatternTable, Query, QueryAnalyzer, QueryType};
pub use thresholds::{
    AdaptiveThresholds, QualityTier, ThresholdConfig, ThresholdError, ThresholdManager,
    TierSelection, select_candidates,
};
