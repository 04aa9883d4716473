//! Per-round provider quality.
//!
//! A provider that spreads its scores, commits to a clear best candidate and broadly agrees
//! with upstream similarity rates higher than one that returns a flat vector.

use crate::query::Query;

use super::stats;

const VARIANCE_SCALE: f32 = 0.05;
const SPECIFIC_QUERY_BONUS: f32 = 0.1;
const SPECIFIC_QUERY_MIN_WORDS: usize = 3;

const QUESTION_WORDS: &[&str] = &[
    "was", "wie", "wo", "wer", "warum", "wann", "welche", "welcher", "welches", "wieso",
    "weshalb", "what", "how", "where", "who", "why", "when", "which",
];

/// Coarse shape of a query, used for quality and strategy bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryShape {
    pub word_count: usize,
    pub is_question: bool,
}

impl QueryShape {
    pub fn of(query: &Query) -> Self {
        let text = query.original().trim();
        let first = text
            .split_whitespace()
            .next()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .unwrap_or_default();

        Self {
            word_count: query.word_count(),
            is_question: text.ends_with('?') || QUESTION_WORDS.contains(&first.as_str()),
        }
    }

    /// A question with enough words to be about something in particular.
    pub fn is_specific(&self) -> bool {
        self.is_question && self.word_count >= SPECIFIC_QUERY_MIN_WORDS
    }
}

/// Quality of one provider's scores in `[0, 1]`.
///
/// Weighted sum of variance (scaled by 0.05 and capped), max score, range, doubled
/// standard deviation (capped), positive correlation with `similarity`, plus a bonus for
/// specific queries.
pub fn provider_quality(scores: &[f32], similarity: &[f32], shape: QueryShape) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }

    let variance = stats::variance(scores);
    let std = variance.sqrt();
    let max = stats::max(scores);
    let range = max - stats::min(scores);
    let correlation = stats::pearson(scores, similarity).unwrap_or(0.0).max(0.0);

    let mut quality = 0.25 * (variance / VARIANCE_SCALE).min(1.0)
        + 0.2 * max
        + 0.2 * range
        + 0.15 * (2.0 * std).min(1.0)
        + 0.2 * correlation;

    if shape.is_specific() {
        quality += SPECIFIC_QUERY_BONUS;
    }

    quality.clamp(0.0, 1.0)
}
