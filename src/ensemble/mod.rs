//! Multi-provider reranking.
//!
//! Each round:
//! 1. every [`ScoringProvider`] scores the candidates concurrently under a timeout;
//! 2. each succeeding provider gets a quality score, kept in a rolling history;
//! 3. adaptive weights blend current and historical quality, with a floor;
//! 4. every [`FusionStrategy`] fuses the scores and the fittest one is chosen
//!    (unless [`EnsembleConfig::fixed_strategy`] pins one);
//! 5. fused scores are boosted or penalised by provider agreement.
//!
//! Failures never escape: a failing provider is excluded, and if all fail the round
//! returns zeros with [`EnsembleDiagnostics::ensemble_failed`] set.

pub mod agreement;
pub mod config;
pub mod error;
pub mod fusion;
mod history;
pub mod provider;
pub mod providers;
pub mod quality;
pub mod reranker;
pub mod selection;
pub mod stats;
pub mod types;
pub mod weights;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::EnsembleConfig;
pub use error::{EnsembleError, ProviderError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{FailingProvider, RawProvider, SlowProvider, StaticProvider};
pub use provider::{ScoringProvider, validate_scores};
pub use providers::{EmbeddingSimilarityProvider, HttpRerankProvider, LexicalProvider};
pub use quality::QueryShape;
pub use reranker::EnsembleReranker;
pub use types::{
    EnsembleDiagnostics, EnsembleOutcome, FusionStrategy, ProviderScores, RerankOutcome,
};
pub use weights::normalize_with_floor;
