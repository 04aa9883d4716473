use std::collections::HashMap;

use super::quality::QueryShape;
use super::stats;
use super::types::FusionStrategy;

const SHORT_QUERY_MAX_WORDS: usize = 3;
const LONG_QUERY_MIN_WORDS: usize = 9;
const SHAPE_BONUS: f32 = 0.05;
const VARIANCE_SCALE: f32 = 0.05;

/// Heuristic fitness of a fused score vector for one strategy.
///
/// Separation of the top two scores, mean of the top three, variance, stability,
/// historical usage share, and a bonus when the strategy suits the query's shape. The
/// weights are starting points and have not been calibrated against labelled data.
pub fn strategy_fitness(
    strategy: FusionStrategy,
    fused: &[f32],
    shape: QueryShape,
    usage: &HashMap<FusionStrategy, u64>,
) -> f32 {
    if fused.is_empty() {
        return 0.0;
    }

    let sorted = stats::sorted_desc(fused);
    let separation = if sorted.len() >= 2 {
        sorted[0] - sorted[1]
    } else {
        0.0
    };
    let top_mean = stats::mean(&sorted[..sorted.len().min(3)]);
    let variance = stats::variance(fused);
    let stability = 1.0 / (1.0 + variance.sqrt());

    let total_usage: u64 = usage.values().sum();
    let usage_share = if total_usage > 0 {
        usage.get(&strategy).copied().unwrap_or(0) as f32 / total_usage as f32
    } else {
        0.0
    };

    0.3 * separation
        + 0.25 * top_mean
        + 0.2 * (variance / VARIANCE_SCALE).min(1.0)
        + 0.1 * stability
        + 0.05 * usage_share
        + shape_bonus(strategy, shape)
}

fn shape_bonus(strategy: FusionStrategy, shape: QueryShape) -> f32 {
    let suits = match strategy {
        FusionStrategy::AdaptiveWeighted => shape.word_count <= SHORT_QUERY_MAX_WORDS,
        FusionStrategy::RankFusion | FusionStrategy::QualityWeighted => {
            shape.word_count >= LONG_QUERY_MIN_WORDS
        }
        FusionStrategy::ConfidenceFusion => shape.is_question,
        FusionStrategy::HybridMaxAverage => false,
    };
    if suits { SHAPE_BONUS } else { 0.0 }
}

/// Picks the fittest strategy; ties go to the earlier entry of [`FusionStrategy::ALL`].
pub fn select_best<'a>(
    candidates: impl IntoIterator<Item = (FusionStrategy, &'a [f32])>,
    shape: QueryShape,
    usage: &HashMap<FusionStrategy, u64>,
) -> Option<FusionStrategy> {
    let mut best: Option<(FusionStrategy, f32)> = None;
    for (strategy, fused) in candidates {
        let fitness = strategy_fitness(strategy, fused, shape, usage);
        match best {
            Some((_, best_fitness)) if fitness <= best_fitness => {}
            _ => best = Some((strategy, fitness)),
        }
    }
    best.map(|(strategy, _)| strategy)
}
