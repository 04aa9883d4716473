use serde::{Deserialize, Serialize};

/// Classification of a user query, used to pick retrieval strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryType {
    WhatIs,
    HowDoes,
    WhereIs,
    Why,
    WhoIs,
    Definition,
    Comparison,
    Procedure,
    Factual,
    Short,
    Complex,
    General,
}

impl QueryType {
    pub const ALL: [QueryType; 12] = [
        QueryType::WhatIs,
        QueryType::HowDoes,
        QueryType::WhereIs,
        QueryType::Why,
        QueryType::WhoIs,
        QueryType::Definition,
        QueryType::Comparison,
        QueryType::Procedure,
        QueryType::Factual,
        QueryType::Short,
        QueryType::Complex,
        QueryType::General,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::WhatIs => "WHAT_IS",
            QueryType::HowDoes => "HOW_DOES",
            QueryType::WhereIs => "WHERE_IS",
            QueryType::Why => "WHY",
            QueryType::WhoIs => "WHO_IS",
            QueryType::Definition => "DEFINITION",
            QueryType::Comparison => "COMPARISON",
            QueryType::Procedure => "PROCEDURE",
            QueryType::Factual => "FACTUAL",
            QueryType::Short => "SHORT",
            QueryType::Complex => "COMPLEX",
            QueryType::General => "GENERAL",
        }
    }

    /// Types assigned by word-count rules or fallbacks; they cannot carry regex patterns.
    #[inline]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            QueryType::Short | QueryType::Complex | QueryType::Factual | QueryType::General
        )
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Analyzed query. Created once per request by [`super::QueryAnalyzer`]; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    original: String,
    query_type: QueryType,
    word_count: usize,
    complexity_score: f32,
    semantic_density: f32,
    language_confidence: f32,
}

impl Query {
    /// Builds a query from already-computed features. Scores are clamped to `[0, 1]`.
    pub fn new(
        original: impl Into<String>,
        query_type: QueryType,
        word_count: usize,
        complexity_score: f32,
        semantic_density: f32,
        language_confidence: f32,
    ) -> Self {
        Self {
            original: original.into(),
            query_type,
            word_count,
            complexity_score: unit(complexity_score),
            semantic_density: unit(semantic_density),
            language_confidence: unit(language_confidence),
        }
    }

    /// Neutral classification used for empty input.
    pub fn neutral(original: impl Into<String>) -> Self {
        Self::new(original, QueryType::General, 0, 0.0, 0.0, 0.5)
    }

    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline]
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    #[inline]
    pub fn complexity_score(&self) -> f32 {
        self.complexity_score
    }

    #[inline]
    pub fn semantic_density(&self) -> f32 {
        self.semantic_density
    }

    /// `1.0` for the primary language, `0.0` for the secondary one, `0.5` when undecided.
    #[inline]
    pub fn language_confidence(&self) -> f32 {
        self.language_confidence
    }
}

#[inline]
fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
