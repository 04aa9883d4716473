use serde::Serialize;

use crate::candidate::Candidate;

/// Query-specific similarity thresholds. Created fresh per query; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdaptiveThresholds {
    pub high_quality: f32,
    pub good_quality: f32,
    pub fallback: f32,
    pub min_results: usize,
    pub max_results: usize,
    pub context_expansion_trigger: f32,
}

impl AdaptiveThresholds {
    /// Returns `true` if `fallback < good_quality < high_quality`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.fallback < self.good_quality && self.good_quality < self.high_quality
    }

    /// Similarity cutoff for a tier.
    #[inline]
    pub fn cutoff(&self, tier: QualityTier) -> f32 {
        match tier {
            QualityTier::High => self.high_quality,
            QualityTier::Good => self.good_quality,
            QualityTier::Fallback => self.fallback,
        }
    }
}

/// Similarity band used to decide how many candidates are good enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    High,
    Good,
    Fallback,
}

impl QualityTier {
    /// Tiers from strictest to loosest.
    pub const ORDERED: [QualityTier; 3] = [QualityTier::High, QualityTier::Good, QualityTier::Fallback];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Good => "good",
            QualityTier::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Candidates selected from one tier, in descending similarity order.
#[derive(Debug, Clone)]
pub struct TierSelection {
    pub tier: QualityTier,
    pub candidates: Vec<Candidate>,
}

impl TierSelection {
    /// Returns `true` if the tier filled `min_results`.
    pub fn is_satisfied(&self, thresholds: &AdaptiveThresholds) -> bool {
        self.candidates.len() >= thresholds.min_results
    }
}
