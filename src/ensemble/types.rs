use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// How per-provider scores are combined into one score per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    /// Weighted sum with the adaptive provider weights.
    AdaptiveWeighted,
    /// Weighted sum with this round's provider quality as weights.
    QualityWeighted,
    /// Reciprocal rank fusion.
    RankFusion,
    /// Scores scaled by their confidence relative to the provider's best score.
    ConfidenceFusion,
    /// Blend of mean and max, leaning on the mean as providers agree.
    HybridMaxAverage,
}

impl FusionStrategy {
    /// All strategies, in tie-break order.
    pub const ALL: [FusionStrategy; 5] = [
        FusionStrategy::AdaptiveWeighted,
        FusionStrategy::QualityWeighted,
        FusionStrategy::RankFusion,
        FusionStrategy::ConfidenceFusion,
        FusionStrategy::HybridMaxAverage,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionStrategy::AdaptiveWeighted => "adaptive_weighted",
            FusionStrategy::QualityWeighted => "quality_weighted",
            FusionStrategy::RankFusion => "rank_fusion",
            FusionStrategy::ConfidenceFusion => "confidence_fusion",
            FusionStrategy::HybridMaxAverage => "hybrid_max_average",
        }
    }
}

impl std::fmt::Display for FusionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scores from one provider that succeeded this round.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderScores {
    pub name: String,
    pub scores: Vec<f32>,
    pub quality: f32,
}

/// What happened during one ensemble scoring round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnsembleDiagnostics {
    /// `None` when nothing was fused (no candidates or every provider failed).
    pub strategy: Option<FusionStrategy>,
    /// Adaptive weights used this round, by provider name.
    pub weights: HashMap<String, f32>,
    /// Quality score of each succeeding provider this round.
    pub provider_quality: HashMap<String, f32>,
    pub providers_succeeded: Vec<String>,
    pub providers_failed: Vec<String>,
    /// `1 - mean per-candidate standard deviation` across providers.
    pub consistency_score: f32,
    /// Mean provider quality.
    pub quality_score: f32,
    pub ensemble_failed: bool,
}

/// Final scores in input order plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutcome {
    pub scores: Vec<f32>,
    pub diagnostics: EnsembleDiagnostics,
}

/// Candidates reordered by ensemble score.
#[derive(Debug, Clone)]
pub struct RerankOutcome {
    pub candidates: Vec<Candidate>,
    pub diagnostics: EnsembleDiagnostics,
}
