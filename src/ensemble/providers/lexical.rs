use std::collections::HashSet;

use async_trait::async_trait;

use crate::candidate::Candidate;
use crate::ensemble::error::ProviderError;
use crate::ensemble::provider::ScoringProvider;
use crate::query::PatternTable;

/// Term-overlap scorer.
///
/// Combines recall of the query's content words (60%) with Jaccard overlap (40%) and
/// squashes the result through a logistic curve centred on 0.5. Stop-words are ignored.
#[derive(Debug, Clone)]
pub struct LexicalProvider {
    name: String,
    stop_words: HashSet<String>,
}

impl LexicalProvider {
    pub const DEFAULT_NAME: &'static str = "lexical";

    /// Uses the stop-words of the built-in pattern table.
    pub fn new() -> Self {
        Self::with_stop_words(PatternTable::default().stopwords)
    }

    pub fn with_stop_words(stop_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn content_words<'a>(&self, text: &'a str) -> HashSet<&'a str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty() && !self.stop_words.contains(*w))
            .collect()
    }

    /// Overlap score of one candidate in `[0, 1]`.
    pub fn score_pair(&self, query: &str, candidate: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let candidate_lower = candidate.to_lowercase();
        let query_words = self.content_words(&query_lower);
        let candidate_words = self.content_words(&candidate_lower);

        if query_words.is_empty() {
            let shorter = query.len().min(candidate.len()) as f32;
            let longer = query.len().max(candidate.len()).max(1) as f32;
            return shorter / longer * 0.3;
        }

        let matches = query_words.intersection(&candidate_words).count();
        let recall = matches as f32 / query_words.len() as f32;
        let union = query_words.union(&candidate_words).count();
        let jaccard = if union > 0 {
            matches as f32 / union as f32
        } else {
            0.0
        };

        let base = 0.6 * recall + 0.4 * jaccard;
        let squashed = 1.0 / (1.0 + (-8.0 * (base - 0.5)).exp());
        squashed.clamp(0.0, 1.0)
    }
}

impl Default for LexicalProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringProvider for LexicalProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, query: &str, candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        Ok(candidates
            .iter()
            .map(|c| self.score_pair(query, &c.content))
            .collect())
    }
}
