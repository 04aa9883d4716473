use tracing::debug;

use crate::candidate::{Candidate, sort_by_similarity};

use super::types::{AdaptiveThresholds, QualityTier, TierSelection};

/// Picks the strictest tier that yields at least `min_results` candidates.
///
/// Falls back to the loosest tier even when it is undersized. The chosen subset keeps
/// descending similarity order and is truncated to `max_results`. Each selected candidate's
/// `composite_score` is seeded with its similarity score.
pub fn select_candidates(candidates: &[Candidate], thresholds: &AdaptiveThresholds) -> TierSelection {
    let mut sorted = candidates.to_vec();
    sort_by_similarity(&mut sorted);

    let mut chosen = QualityTier::Fallback;
    for tier in QualityTier::ORDERED {
        let cutoff = thresholds.cutoff(tier);
        let count = sorted
            .iter()
            .filter(|c| c.similarity_score >= cutoff)
            .count();

        debug!(tier = %tier, cutoff, count, "Quality tier size");

        if count >= thresholds.min_results {
            chosen = tier;
            break;
        }
    }

    let cutoff = thresholds.cutoff(chosen);
    let mut selected: Vec<Candidate> = sorted
        .into_iter()
        .filter(|c| c.similarity_score >= cutoff)
        .take(thresholds.max_results)
        .collect();

    for candidate in &mut selected {
        candidate.composite_score = Some(candidate.similarity_score);
    }

    debug!(
        tier = %chosen,
        selected = selected.len(),
        min_results = thresholds.min_results,
        "Selected quality tier"
    );

    TierSelection {
        tier: chosen,
        candidates: selected,
    }
}
