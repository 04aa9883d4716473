use super::stats;
use super::types::ProviderScores;

const LOW_SPREAD: f32 = 0.15;
const HIGH_SPREAD: f32 = 0.4;
const HIGH_MEAN: f32 = 0.6;
const MODERATE_MEAN: f32 = 0.3;
const MAX_BOOST: f32 = 0.2;
const MODERATE_BOOST: f32 = 0.05;
const MAX_PENALTY: f32 = 0.15;
const UNANIMOUS_LEVEL: f32 = 0.5;
const UNANIMOUS_BONUS: f32 = 0.05;

/// Weight at or above which a provider is trusted enough to override disagreement.
pub const CONFIDENT_WEIGHT: f32 = 0.7;

/// Nudges fused scores by how much the providers agree on each candidate.
///
/// Needs at least two providers; otherwise `fused` is returned unchanged. Strong
/// agreement on a high score boosts it, and unanimous support above 0.5 adds a small bonus.
/// Strong disagreement without a confident provider caps the score at the providers' mean
/// and subtracts a penalty, so a split candidate always ends below its simple average
/// whichever strategy fused it. Results are clamped to `[0, 1]`.
pub fn adjust_for_agreement(
    fused: &[f32],
    providers: &[ProviderScores],
    has_confident_provider: bool,
) -> Vec<f32> {
    if providers.len() < 2 {
        return fused.to_vec();
    }

    fused
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            let column: Vec<f32> = providers.iter().map(|p| p.scores[i]).collect();
            let mean = stats::mean(&column);
            let std = stats::sample_std(&column);

            let mut adjusted = score;
            if std < LOW_SPREAD {
                let tightness = 1.0 - std / LOW_SPREAD;
                if mean > HIGH_MEAN {
                    let height = ((mean - HIGH_MEAN) / (1.0 - HIGH_MEAN)).min(1.0);
                    adjusted += MAX_BOOST * tightness * height;
                } else if mean > MODERATE_MEAN {
                    adjusted += MODERATE_BOOST * tightness;
                }
            } else if std > HIGH_SPREAD && !has_confident_provider {
                let penalty = (MAX_PENALTY * std / 0.7).min(MAX_PENALTY);
                adjusted = adjusted.min(mean) - penalty;
            }

            if column.iter().all(|s| *s > UNANIMOUS_LEVEL) {
                adjusted += UNANIMOUS_BONUS;
            }

            adjusted.clamp(0.0, 1.0)
        })
        .collect()
}

/// `1 − mean per-candidate sample std` across providers; `1.0` with fewer than two.
pub fn consistency(providers: &[ProviderScores], num_candidates: usize) -> f32 {
    if providers.len() < 2 || num_candidates == 0 {
        return 1.0;
    }
    let spreads: Vec<f32> = (0..num_candidates)
        .map(|i| {
            let column: Vec<f32> = providers.iter().map(|p| p.scores[i]).collect();
            stats::sample_std(&column)
        })
        .collect();
    (1.0 - stats::mean(&spreads)).clamp(0.0, 1.0)
}
