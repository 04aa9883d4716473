use serde::Serialize;

use crate::candidate::Candidate;
use crate::ensemble::FusionStrategy;
use crate::expansion::ExpansionStrategy;
use crate::query::QueryType;
use crate::thresholds::{AdaptiveThresholds, QualityTier};

/// What happened to one query on its way through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalMetadata {
    pub query_type: QueryType,
    pub complexity_score: f32,
    pub semantic_density: f32,
    pub language_confidence: f32,
    /// Tier the selected candidates came from.
    pub quality_tier_used: QualityTier,
    pub thresholds_used: AdaptiveThresholds,
    /// `true` if expansion added at least one candidate.
    pub context_expanded: bool,
    /// Set whenever expansion was attempted.
    pub expansion_strategy: Option<ExpansionStrategy>,
    pub fusion_strategy: Option<FusionStrategy>,
    pub consistency_score: f32,
    /// Candidates handed to the pipeline.
    pub original_count: usize,
    /// Candidates returned.
    pub final_count: usize,
    pub ensemble_failed: bool,
}

/// Ranked candidates plus their [`RetrievalMetadata`].
#[derive(Debug, Clone)]
pub struct RetrievalResponse {
    pub candidates: Vec<Candidate>,
    pub metadata: RetrievalMetadata,
}
