//! Adaptive provider weights.

use super::stats;

const RECENT_BLEND_MIN_SAMPLES: usize = 3;

/// Blends this round's quality with the provider's history average.
///
/// `history` already contains `current`. With at least three samples the current round
/// counts 70%, otherwise the two are averaged.
pub fn blend_quality(current: f32, history: &[f32]) -> f32 {
    if history.is_empty() {
        return current;
    }
    let average = stats::mean(history);
    if history.len() >= RECENT_BLEND_MIN_SAMPLES {
        0.7 * current + 0.3 * average
    } else {
        0.5 * current + 0.5 * average
    }
}

/// Normalizes `raw` to sum to 1 with every weight at least `floor`.
///
/// Weights below the floor are pinned to it and the remaining mass is redistributed
/// proportionally until no weight falls below. An all-zero input, or a floor that cannot
/// be honoured (`floor * n >= 1`), yields uniform weights.
pub fn normalize_with_floor(raw: &[f32], floor: f32) -> Vec<f32> {
    let n = raw.len();
    if n == 0 {
        return Vec::new();
    }

    let uniform = vec![1.0 / n as f32; n];
    let sanitized: Vec<f32> = raw
        .iter()
        .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
        .collect();
    let total: f32 = sanitized.iter().sum();
    if total <= 0.0 || floor * n as f32 >= 1.0 {
        return uniform;
    }

    let mut weights: Vec<f32> = sanitized.iter().map(|w| w / total).collect();
    let mut pinned = vec![false; n];

    loop {
        let mut changed = false;
        for (w, p) in weights.iter().zip(pinned.iter_mut()) {
            if !*p && *w < floor {
                *p = true;
                changed = true;
            }
        }

        let pinned_count = pinned.iter().filter(|p| **p).count();
        let free_mass = 1.0 - floor * pinned_count as f32;
        let unpinned_sum: f32 = weights
            .iter()
            .zip(&pinned)
            .filter(|(_, p)| !**p)
            .map(|(w, _)| *w)
            .sum();
        let unpinned_count = n - pinned_count;

        for (w, p) in weights.iter_mut().zip(&pinned) {
            *w = if *p {
                floor
            } else if unpinned_sum > 0.0 {
                *w * free_mass / unpinned_sum
            } else {
                free_mass / unpinned_count as f32
            };
        }

        if !changed || unpinned_count == 0 {
            break;
        }
    }

    weights
}
