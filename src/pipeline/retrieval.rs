use std::sync::Arc;

use tracing::{info, instrument};

use crate::candidate::Candidate;
use crate::config::Config;
use crate::ensemble::{EnsembleReranker, ScoringProvider};
use crate::expansion::{CandidateSource, ContextExpansionService, ExpansionOutcome};
use crate::query::QueryAnalyzer;
use crate::thresholds::{ThresholdManager, select_candidates};

use super::error::PipelineError;
use super::types::{RetrievalMetadata, RetrievalResponse};

/// End-to-end retrieval quality pass: analyze, select by tier, expand, rerank.
///
/// Without a [`CandidateSource`] the expansion step is skipped.
pub struct RetrievalPipeline {
    analyzer: QueryAnalyzer,
    thresholds: ThresholdManager,
    expansion: Option<ContextExpansionService>,
    reranker: Arc<EnsembleReranker>,
}

impl RetrievalPipeline {
    pub fn new(
        analyzer: QueryAnalyzer,
        thresholds: ThresholdManager,
        reranker: Arc<EnsembleReranker>,
    ) -> Self {
        Self {
            analyzer,
            thresholds,
            expansion: None,
            reranker,
        }
    }

    /// Enables context expansion backed by `source`.
    pub fn with_expansion(mut self, source: Arc<dyn CandidateSource>) -> Self {
        self.expansion = Some(ContextExpansionService::new(source));
        self
    }

    /// Builds every component from `config`.
    ///
    /// Loads the pattern table from `config.patterns_path` when set.
    pub fn from_config(
        config: &Config,
        providers: Vec<Arc<dyn ScoringProvider>>,
        source: Option<Arc<dyn CandidateSource>>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let analyzer = match config.patterns_path {
            Some(ref path) => QueryAnalyzer::from_path(path)?,
            None => QueryAnalyzer::new(),
        };
        let thresholds = ThresholdManager::new(config.threshold_config())?;
        let reranker = Arc::new(EnsembleReranker::new(providers, config.ensemble_config())?);

        let pipeline = Self::new(analyzer, thresholds, reranker);
        Ok(match source {
            Some(source) => pipeline.with_expansion(source),
            None => pipeline,
        })
    }

    pub fn reranker(&self) -> &Arc<EnsembleReranker> {
        &self.reranker
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }

    /// Runs `query` and its upstream `candidates` through the pipeline.
    ///
    /// Never fails. Provider and fetch errors degrade the result and are reported in
    /// the metadata.
    #[instrument(skip(self, query, candidates), fields(num_candidates = candidates.len()))]
    pub async fn process(&self, query: &str, candidates: Vec<Candidate>) -> RetrievalResponse {
        let original_count = candidates.len();

        let analyzed = self.analyzer.analyze(query);
        let thresholds = self.thresholds.get_thresholds(&analyzed);

        let selection = select_candidates(&candidates, &thresholds);
        let tier = selection.tier;
        info!(
            query_type = %analyzed.query_type(),
            tier = %tier,
            selected = selection.candidates.len(),
            min_results = thresholds.min_results,
            "Selected quality tier"
        );

        let expansion = match self.expansion {
            Some(ref service) => service.expand(selection.candidates, &analyzed, &thresholds).await,
            None => ExpansionOutcome {
                candidates: selection.candidates,
                expanded: false,
                strategy: None,
                added: 0,
            },
        };

        let reranked = self
            .reranker
            .rerank(&analyzed, expansion.candidates, Some(thresholds.max_results))
            .await;

        let metadata = RetrievalMetadata {
            query_type: analyzed.query_type(),
            complexity_score: analyzed.complexity_score(),
            semantic_density: analyzed.semantic_density(),
            language_confidence: analyzed.language_confidence(),
            quality_tier_used: tier,
            thresholds_used: thresholds,
            context_expanded: expansion.expanded,
            expansion_strategy: expansion.strategy,
            fusion_strategy: reranked.diagnostics.strategy,
            consistency_score: reranked.diagnostics.consistency_score,
            original_count,
            final_count: reranked.candidates.len(),
            ensemble_failed: reranked.diagnostics.ensemble_failed,
        };

        info!(
            final_count = metadata.final_count,
            context_expanded = metadata.context_expanded,
            ensemble_failed = metadata.ensemble_failed,
            "Retrieval pass complete"
        );

        RetrievalResponse {
            candidates: reranked.candidates,
            metadata,
        }
    }
}

impl std::fmt::Debug for RetrievalPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalPipeline")
            .field("pattern_table_version", &self.analyzer.table_version())
            .field("expansion", &self.expansion.is_some())
            .field("providers", &self.reranker.provider_names())
            .finish()
    }
}
