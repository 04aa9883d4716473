use serde::Serialize;

use crate::candidate::Candidate;
use crate::query::QueryType;

/// Which chunks a fetch should return relative to `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionScope {
    /// Chunks adjacent to the ones already retrieved.
    Neighbors,
    /// Any further chunks of the same document.
    SameSource,
}

/// How context is widened when retrieval looks thin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionStrategy {
    /// Neighbours first, then the rest of the same documents.
    Progressive,
    SameSource,
    Neighbors,
}

impl ExpansionStrategy {
    /// Strategy for a query type: `SHORT` queries widen progressively, `COMPLEX` and
    /// `DEFINITION` pull more of the same documents, everything else takes neighbours.
    pub fn for_query_type(query_type: QueryType) -> Self {
        match query_type {
            QueryType::Short => ExpansionStrategy::Progressive,
            QueryType::Complex | QueryType::Definition => ExpansionStrategy::SameSource,
            _ => ExpansionStrategy::Neighbors,
        }
    }

    /// Fetch scopes to try, in order.
    pub fn scopes(&self) -> &'static [ExpansionScope] {
        match self {
            ExpansionStrategy::Progressive => {
                &[ExpansionScope::Neighbors, ExpansionScope::SameSource]
            }
            ExpansionStrategy::SameSource => &[ExpansionScope::SameSource],
            ExpansionStrategy::Neighbors => &[ExpansionScope::Neighbors],
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpansionStrategy::Progressive => "progressive",
            ExpansionStrategy::SameSource => "same_source",
            ExpansionStrategy::Neighbors => "neighbors",
        }
    }
}

impl std::fmt::Display for ExpansionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One request to a [`super::CandidateSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub source: String,
    pub query: String,
    pub count: usize,
    pub scope: ExpansionScope,
}

/// Result of [`super::ContextExpansionService::expand`].
#[derive(Debug, Clone)]
pub struct ExpansionOutcome {
    /// Merged candidates in descending similarity order, capped at `max_results`.
    pub candidates: Vec<Candidate>,
    /// `true` if at least one fetched candidate made it into `candidates`.
    pub expanded: bool,
    /// Strategy used, `None` if expansion was not triggered.
    pub strategy: Option<ExpansionStrategy>,
    /// Number of new candidates in the result.
    pub added: usize,
}
