//! Fusion strategies over a provider × candidate score matrix.

use std::cmp::Ordering;

use super::stats;
use super::types::{FusionStrategy, ProviderScores};

const RRF_K_MIN: f32 = 30.0;
const RRF_K_MAX: f32 = 60.0;

/// Fuses the scores of every provider into one score per candidate.
///
/// `weights` is parallel to `providers` and sums to 1. Every returned score is in `[0, 1]`.
pub fn fuse(
    strategy: FusionStrategy,
    providers: &[ProviderScores],
    weights: &[f32],
    num_candidates: usize,
) -> Vec<f32> {
    if providers.is_empty() || num_candidates == 0 {
        return vec![0.0; num_candidates];
    }

    let fused = match strategy {
        FusionStrategy::AdaptiveWeighted => weighted_sum(providers, weights, num_candidates),
        FusionStrategy::QualityWeighted => {
            let qualities: Vec<f32> = providers.iter().map(|p| p.quality).collect();
            let total: f32 = qualities.iter().sum();
            let quality_weights: Vec<f32> = if total > 0.0 {
                qualities.iter().map(|q| q / total).collect()
            } else {
                vec![1.0 / providers.len() as f32; providers.len()]
            };
            weighted_sum(providers, &quality_weights, num_candidates)
        }
        FusionStrategy::RankFusion => rank_fusion(providers, num_candidates),
        FusionStrategy::ConfidenceFusion => confidence_fusion(providers, num_candidates),
        FusionStrategy::HybridMaxAverage => hybrid_max_average(providers, num_candidates),
    };

    fused.into_iter().map(|s| s.clamp(0.0, 1.0)).collect()
}

fn weighted_sum(providers: &[ProviderScores], weights: &[f32], n: usize) -> Vec<f32> {
    let mut fused = vec![0.0f32; n];
    for (provider, weight) in providers.iter().zip(weights) {
        for (acc, score) in fused.iter_mut().zip(&provider.scores) {
            *acc += weight * score;
        }
    }
    fused
}

/// Reciprocal rank fusion, `Σ 1 / (k + rank)` with `k = clamp(n / 2, 30, 60)`.
///
/// Ranks carry no magnitude, so the RRF sums are min-max mapped onto the span of the
/// per-candidate mean scores. The RRF order is kept and the result never leaves the range
/// the providers actually produced. Equal sums fall back to the means.
fn rank_fusion(providers: &[ProviderScores], n: usize) -> Vec<f32> {
    let k = ((n / 2) as f32).clamp(RRF_K_MIN, RRF_K_MAX);
    let mut rrf = vec![0.0f32; n];

    for provider in providers {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            provider.scores[b]
                .partial_cmp(&provider.scores[a])
                .unwrap_or(Ordering::Equal)
        });
        for (rank, &idx) in order.iter().enumerate() {
            rrf[idx] += 1.0 / (k + (rank + 1) as f32);
        }
    }

    let means: Vec<f32> = (0..n)
        .map(|i| {
            let column: Vec<f32> = providers.iter().map(|p| p.scores[i]).collect();
            stats::mean(&column)
        })
        .collect();

    let rrf_low = stats::min(&rrf);
    let rrf_span = stats::max(&rrf) - rrf_low;
    if rrf_span <= f32::EPSILON {
        return means;
    }

    let low = stats::min(&means);
    let span = stats::max(&means) - low;
    rrf.iter()
        .map(|s| low + (s - rrf_low) / rrf_span * span)
        .collect()
}

/// Each provider's scores weighted by `(score / provider_max)²`, averaged over providers.
fn confidence_fusion(providers: &[ProviderScores], n: usize) -> Vec<f32> {
    let mut fused = vec![0.0f32; n];
    for provider in providers {
        let max = stats::max(&provider.scores);
        if max <= 0.0 {
            continue;
        }
        for (acc, score) in fused.iter_mut().zip(&provider.scores) {
            let confidence = (score / max).powi(2);
            *acc += confidence * score;
        }
    }
    let count = providers.len() as f32;
    fused.iter().map(|s| s / count).collect()
}

/// `agreement · mean + (1 − agreement) · max` with `agreement = mean / max` per candidate.
fn hybrid_max_average(providers: &[ProviderScores], n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let column: Vec<f32> = providers.iter().map(|p| p.scores[i]).collect();
            let avg = stats::mean(&column);
            let max = stats::max(&column);
            let agreement = if max > 0.0 { avg / max } else { 1.0 };
            agreement * avg + (1.0 - agreement) * max
        })
        .collect()
}
