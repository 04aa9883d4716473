use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::candidate::{Candidate, sort_by_similarity};
use crate::query::Query;

use super::agreement::{CONFIDENT_WEIGHT, adjust_for_agreement, consistency};
use super::config::EnsembleConfig;
use super::error::{EnsembleError, ProviderError};
use super::fusion::fuse;
use super::history::PerformanceState;
use super::provider::{ScoringProvider, validate_scores};
use super::quality::{QueryShape, provider_quality};
use super::selection::select_best;
use super::stats;
use super::types::{
    EnsembleDiagnostics, EnsembleOutcome, FusionStrategy, ProviderScores, RerankOutcome,
};
use super::weights::{blend_quality, normalize_with_floor};

const RERANK_WEIGHT: f32 = 0.7;
const SIMILARITY_WEIGHT: f32 = 0.3;

/// Scores candidates with several providers and fuses the results.
///
/// Provider calls run concurrently, each under the configured timeout. Failing providers
/// are dropped from the round; if none succeed the round yields all-zero scores and sets
/// `ensemble_failed`. Provider quality history and strategy usage persist across rounds.
pub struct EnsembleReranker {
    providers: Vec<Arc<dyn ScoringProvider>>,
    config: EnsembleConfig,
    state: Mutex<PerformanceState>,
}

impl EnsembleReranker {
    pub fn new(
        providers: Vec<Arc<dyn ScoringProvider>>,
        config: EnsembleConfig,
    ) -> Result<Self, EnsembleError> {
        config.validate()?;

        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.name().to_string()) {
                return Err(EnsembleError::DuplicateProvider {
                    name: provider.name().to_string(),
                });
            }
        }

        Ok(Self {
            providers,
            config,
            state: Mutex::new(PerformanceState::default()),
        })
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Weights from the most recent successful round, by provider name.
    pub fn current_weights(&self) -> HashMap<String, f32> {
        self.state.lock().weights().clone()
    }

    /// Recent quality scores for `provider`, oldest first.
    pub fn provider_history(&self, provider: &str) -> Vec<f32> {
        self.state.lock().history(provider)
    }

    /// How often each strategy has been chosen.
    pub fn strategy_usage(&self) -> HashMap<FusionStrategy, u64> {
        self.state.lock().strategy_usage().clone()
    }

    /// Forgets all history, usage counts and weights.
    pub fn reset(&self) {
        self.state.lock().reset();
    }

    /// Ensemble scores for `candidates`, in input order.
    #[instrument(
        skip(self, query, candidates),
        fields(num_candidates = candidates.len(), num_providers = self.providers.len())
    )]
    pub async fn score(&self, query: &Query, candidates: &[Candidate]) -> EnsembleOutcome {
        let n = candidates.len();
        if n == 0 {
            return EnsembleOutcome {
                scores: Vec::new(),
                diagnostics: EnsembleDiagnostics {
                    consistency_score: 1.0,
                    ..Default::default()
                },
            };
        }

        let (succeeded, failed) = self.collect_scores(query.original(), candidates).await;

        if succeeded.is_empty() {
            error!(
                providers_failed = ?failed,
                "All scoring providers failed; returning zero scores"
            );
            return EnsembleOutcome {
                scores: vec![0.0; n],
                diagnostics: EnsembleDiagnostics {
                    providers_failed: failed,
                    ensemble_failed: true,
                    ..Default::default()
                },
            };
        }

        let shape = QueryShape::of(query);
        let similarity: Vec<f32> = candidates.iter().map(|c| c.similarity_score).collect();
        let providers: Vec<ProviderScores> = succeeded
            .into_iter()
            .map(|(name, scores)| {
                let quality = provider_quality(&scores, &similarity, shape);
                ProviderScores {
                    name,
                    scores,
                    quality,
                }
            })
            .collect();

        let (weights, usage) = {
            let mut state = self.state.lock();
            let weights = self.update_weights(&mut state, &providers);
            (weights, state.strategy_usage().clone())
        };

        let (strategy, fused) = self.fuse_best(&providers, &weights, n, shape, &usage);
        self.state.lock().record_strategy(strategy);

        let has_confident_provider = weights.iter().any(|w| *w >= CONFIDENT_WEIGHT);
        let scores = adjust_for_agreement(&fused, &providers, has_confident_provider);

        let qualities: Vec<f32> = providers.iter().map(|p| p.quality).collect();
        let diagnostics = EnsembleDiagnostics {
            strategy: Some(strategy),
            weights: providers
                .iter()
                .zip(&weights)
                .map(|(p, w)| (p.name.clone(), *w))
                .collect(),
            provider_quality: providers
                .iter()
                .map(|p| (p.name.clone(), p.quality))
                .collect(),
            providers_succeeded: providers.iter().map(|p| p.name.clone()).collect(),
            providers_failed: failed,
            consistency_score: consistency(&providers, n),
            quality_score: stats::mean(&qualities),
            ensemble_failed: false,
        };

        info!(
            strategy = %strategy,
            succeeded = diagnostics.providers_succeeded.len(),
            failed = diagnostics.providers_failed.len(),
            consistency = diagnostics.consistency_score,
            "Ensemble scoring complete"
        );

        EnsembleOutcome {
            scores,
            diagnostics,
        }
    }

    /// Scores and reorders `candidates`, keeping at most `top_k`.
    ///
    /// Sets `rerank_score` and `composite_score` (`0.7 · rerank + 0.3 · similarity`) and
    /// sorts by rerank score. When the ensemble fails, similarity order is kept and
    /// `rerank_score` stays unset.
    pub async fn rerank(
        &self,
        query: &Query,
        candidates: Vec<Candidate>,
        top_k: Option<usize>,
    ) -> RerankOutcome {
        let outcome = self.score(query, &candidates).await;
        let mut ranked = candidates;

        if outcome.diagnostics.ensemble_failed {
            warn!("Ensemble failed; keeping upstream similarity order");
            for candidate in &mut ranked {
                let similarity = candidate.similarity_score;
                candidate.rerank_score = None;
                candidate.composite_score.get_or_insert(similarity);
            }
            sort_by_similarity(&mut ranked);
        } else {
            for (candidate, score) in ranked.iter_mut().zip(&outcome.scores) {
                candidate.rerank_score = Some(*score);
                candidate.composite_score =
                    Some(RERANK_WEIGHT * score + SIMILARITY_WEIGHT * candidate.similarity_score);
            }
            ranked.sort_by(|a, b| {
                b.rerank_score
                    .partial_cmp(&a.rerank_score)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(k) = top_k {
            ranked.truncate(k);
        }

        RerankOutcome {
            candidates: ranked,
            diagnostics: outcome.diagnostics,
        }
    }

    async fn collect_scores(
        &self,
        query: &str,
        candidates: &[Candidate],
    ) -> (Vec<(String, Vec<f32>)>, Vec<String>) {
        let timeout = self.config.provider_timeout;
        let expected = candidates.len();

        let calls = self.providers.iter().map(|provider| async move {
            let name = provider.name().to_string();
            let result = match tokio::time::timeout(timeout, provider.score(query, candidates)).await
            {
                Ok(Ok(scores)) => validate_scores(&name, expected, scores),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(ProviderError::Timeout {
                    provider: name.clone(),
                    timeout,
                }),
            };
            (name, result)
        });

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (name, result) in join_all(calls).await {
            match result {
                Ok(scores) => succeeded.push((name, scores)),
                Err(e) => {
                    warn!(provider = %name, error = %e, "Scoring provider failed; excluding it");
                    failed.push(name);
                }
            }
        }

        (succeeded, failed)
    }

    fn initial_weight(&self, provider: &str) -> f32 {
        self.config
            .initial_weights
            .get(provider)
            .copied()
            .unwrap_or(1.0 / self.providers.len().max(1) as f32)
    }

    fn update_weights(&self, state: &mut PerformanceState, providers: &[ProviderScores]) -> Vec<f32> {
        let raw: Vec<f32> = providers
            .iter()
            .map(|p| {
                let history = state.record_quality(&p.name, p.quality, self.config.history_window);
                blend_quality(p.quality, &history) * self.initial_weight(&p.name)
            })
            .collect();

        let weights = normalize_with_floor(&raw, self.config.weight_floor);
        state.set_weights(
            providers
                .iter()
                .zip(&weights)
                .map(|(p, w)| (p.name.clone(), *w))
                .collect(),
        );

        debug!(weights = ?weights, "Updated provider weights");
        weights
    }

    fn fuse_best(
        &self,
        providers: &[ProviderScores],
        weights: &[f32],
        n: usize,
        shape: QueryShape,
        usage: &HashMap<FusionStrategy, u64>,
    ) -> (FusionStrategy, Vec<f32>) {
        if let Some(strategy) = self.config.fixed_strategy {
            return (strategy, fuse(strategy, providers, weights, n));
        }

        let mut fused_by_strategy: Vec<(FusionStrategy, Vec<f32>)> = FusionStrategy::ALL
            .iter()
            .map(|&s| (s, fuse(s, providers, weights, n)))
            .collect();

        let best = select_best(
            fused_by_strategy.iter().map(|(s, f)| (*s, f.as_slice())),
            shape,
            usage,
        )
        .unwrap_or(FusionStrategy::AdaptiveWeighted);

        let idx = fused_by_strategy
            .iter()
            .position(|(s, _)| *s == best)
            .unwrap_or(0);
        fused_by_strategy.swap_remove(idx)
    }
}

impl std::fmt::Debug for EnsembleReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsembleReranker")
            .field("providers", &self.provider_names())
            .field("config", &self.config)
            .finish()
    }
}
