use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::candidate::{Candidate, mean_similarity, sort_by_similarity};
use crate::query::Query;
use crate::thresholds::AdaptiveThresholds;

use super::error::ExpansionResult;
use super::types::{ExpansionOutcome, ExpansionStrategy, FetchRequest};

#[async_trait]
/// Retrieves additional chunks on request. The expansion service never reaches the
/// document store by itself.
pub trait CandidateSource: Send + Sync {
    async fn fetch_more(&self, request: FetchRequest) -> ExpansionResult<Vec<Candidate>>;
}

/// Widens a thin candidate set with more context from the documents it came from.
pub struct ContextExpansionService {
    source: Arc<dyn CandidateSource>,
}

impl ContextExpansionService {
    pub fn new(source: Arc<dyn CandidateSource>) -> Self {
        Self { source }
    }

    /// Returns `true` if the mean similarity of `candidates` is below the trigger.
    pub fn should_expand(candidates: &[Candidate], thresholds: &AdaptiveThresholds) -> bool {
        !candidates.is_empty() && mean_similarity(candidates) < thresholds.context_expansion_trigger
    }

    /// Expands `candidates` if their mean similarity is below the query's trigger.
    ///
    /// The first scope is always fetched, even when `candidates` already fill
    /// `max_results`, so stronger neighbours can displace weak chunks. Later scopes run only
    /// while there is room. Fetch failures are logged and skipped. The result is
    /// de-duplicated by (source, content), sorted by similarity and capped at `max_results`.
    #[instrument(
        skip(self, candidates, query, thresholds),
        fields(num_candidates = candidates.len(), query_type = %query.query_type())
    )]
    pub async fn expand(
        &self,
        candidates: Vec<Candidate>,
        query: &Query,
        thresholds: &AdaptiveThresholds,
    ) -> ExpansionOutcome {
        if !Self::should_expand(&candidates, thresholds) {
            debug!(
                mean_similarity = mean_similarity(&candidates),
                trigger = thresholds.context_expansion_trigger,
                "Context expansion not needed"
            );
            return ExpansionOutcome {
                candidates,
                expanded: false,
                strategy: None,
                added: 0,
            };
        }

        let strategy = ExpansionStrategy::for_query_type(query.query_type());
        let sources = distinct_sources(&candidates);
        let original: HashSet<u64> = candidates.iter().map(Candidate::identity).collect();

        info!(
            strategy = %strategy,
            mean_similarity = mean_similarity(&candidates),
            trigger = thresholds.context_expansion_trigger,
            sources = sources.len(),
            "Expanding context"
        );

        let mut merged = candidates;
        for (step, scope) in strategy.scopes().iter().enumerate() {
            if step > 0 && merged.len() >= thresholds.max_results {
                break;
            }
            let count = thresholds
                .max_results
                .saturating_sub(merged.len())
                .max(thresholds.min_results);

            for source in &sources {
                let request = FetchRequest {
                    source: source.clone(),
                    query: query.original().to_string(),
                    count,
                    scope: *scope,
                };
                match self.source.fetch_more(request).await {
                    Ok(fetched) => {
                        debug!(source = %source, scope = ?scope, fetched = fetched.len(), "Fetched context");
                        merged.extend(fetched);
                    }
                    Err(e) => {
                        warn!(source = %source, scope = ?scope, error = %e, "Context fetch failed; skipping");
                    }
                }
            }

            merged = merge_candidates(merged, thresholds.max_results);
        }
        let merged = merge_candidates(merged, thresholds.max_results);

        let added = merged
            .iter()
            .filter(|c| !original.contains(&c.identity()))
            .count();

        info!(added, total = merged.len(), "Context expansion complete");

        ExpansionOutcome {
            candidates: merged,
            expanded: added > 0,
            strategy: Some(strategy),
            added,
        }
    }
}

impl std::fmt::Debug for ContextExpansionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextExpansionService").finish_non_exhaustive()
    }
}

/// Sources in order of their best-scoring candidate.
fn distinct_sources(candidates: &[Candidate]) -> Vec<String> {
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen = HashSet::new();
    sorted
        .into_iter()
        .filter(|c| seen.insert(c.source.as_str()))
        .map(|c| c.source.clone())
        .collect()
}

/// De-duplicates by (source, content), keeping the higher similarity, then sorts and caps.
pub fn merge_candidates(candidates: Vec<Candidate>, max_results: usize) -> Vec<Candidate> {
    let mut positions: HashMap<u64, usize> = HashMap::with_capacity(candidates.len());
    let mut merged: Vec<Candidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.identity();
        match positions.get(&key) {
            Some(&idx) => {
                if candidate.similarity_score > merged[idx].similarity_score {
                    merged[idx] = candidate;
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    sort_by_similarity(&mut merged);
    merged.truncate(max_results);
    merged
}
