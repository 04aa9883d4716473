use async_trait::async_trait;

use crate::candidate::Candidate;

use super::error::ProviderError;

#[async_trait]
/// A source of relevance scores for `(query, candidate)` pairs.
///
/// Implementations return one score per candidate in input order. Scores are expected in
/// `[0, 1]`; the ensemble clamps them and treats non-finite values or a length mismatch as
/// a failure of the whole call.
pub trait ScoringProvider: Send + Sync {
    /// Stable name used for weights and history.
    fn name(&self) -> &str;

    async fn score(&self, query: &str, candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError>;
}

/// Checks a provider's output against the candidate count and clamps it to `[0, 1]`.
pub fn validate_scores(
    provider: &str,
    expected: usize,
    mut scores: Vec<f32>,
) -> Result<Vec<f32>, ProviderError> {
    if scores.len() != expected {
        return Err(ProviderError::LengthMismatch {
            provider: provider.to_string(),
            expected,
            actual: scores.len(),
        });
    }
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ProviderError::NonFinite {
            provider: provider.to_string(),
            index,
        });
    }
    for s in scores.iter_mut() {
        *s = s.clamp(0.0, 1.0);
    }
    Ok(scores)
}
