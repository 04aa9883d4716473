use super::*;
use crate::candidate::Candidate;
use crate::query::{Query, QueryType};
use crate::thresholds::AdaptiveThresholds;
use std::sync::Arc;

fn thresholds(min_results: usize, max_results: usize, trigger: f32) -> AdaptiveThresholds {
    AdaptiveThresholds {
        high_quality: 0.7,
        good_quality: 0.3,
        fallback: 0.15,
        min_results,
        max_results,
        context_expansion_trigger: trigger,
    }
}

fn query(query_type: QueryType) -> Query {
    Query::new("Wie lege ich einen Kalender an?", query_type, 5, 0.4, 0.6, 1.0)
}

fn chunk(source: &str, n: usize, score: f32) -> Candidate {
    Candidate::new(format!("{source} chunk {n}"), source, score)
}

fn service(source: MockCandidateSource) -> (ContextExpansionService, Arc<MockCandidateSource>) {
    let source = Arc::new(source);
    (ContextExpansionService::new(source.clone()), source)
}

#[test]
fn test_strategy_by_query_type() {
    assert_eq!(
        ExpansionStrategy::for_query_type(QueryType::Short),
        ExpansionStrategy::Progressive
    );
    assert_eq!(
        ExpansionStrategy::for_query_type(QueryType::Complex),
        ExpansionStrategy::SameSource
    );
    assert_eq!(
        ExpansionStrategy::for_query_type(QueryType::Definition),
        ExpansionStrategy::SameSource
    );
    for other in [QueryType::WhatIs, QueryType::Procedure, QueryType::General] {
        assert_eq!(
            ExpansionStrategy::for_query_type(other),
            ExpansionStrategy::Neighbors
        );
    }
}

#[tokio::test]
async fn test_high_similarity_not_expanded() {
    let (service, source) = service(MockCandidateSource::new());
    let selected = vec![chunk("a.pdf", 0, 0.9), chunk("a.pdf", 1, 0.85)];

    let outcome = service
        .expand(selected.clone(), &query(QueryType::WhatIs), &thresholds(2, 6, 0.6))
        .await;

    assert!(!outcome.expanded);
    assert_eq!(outcome.strategy, None);
    assert_eq!(outcome.candidates.len(), 2);
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_empty_candidates_not_expanded() {
    let (service, source) = service(MockCandidateSource::new());

    let outcome = service
        .expand(Vec::new(), &query(QueryType::Short), &thresholds(2, 6, 0.4))
        .await;

    assert!(!outcome.expanded);
    assert!(outcome.candidates.is_empty());
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_neighbors_expansion() {
    let (service, source) = service(MockCandidateSource::new().with_chunks(
        "a.pdf",
        ExpansionScope::Neighbors,
        vec![chunk("a.pdf", 7, 0.35), chunk("a.pdf", 8, 0.3)],
    ));
    let selected = vec![chunk("a.pdf", 6, 0.4)];

    let outcome = service
        .expand(selected, &query(QueryType::WhatIs), &thresholds(3, 9, 0.5))
        .await;

    assert!(outcome.expanded);
    assert_eq!(outcome.strategy, Some(ExpansionStrategy::Neighbors));
    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.candidates.len(), 3);
    assert_eq!(outcome.candidates[0].content, "a.pdf chunk 6");

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].scope, ExpansionScope::Neighbors);
    assert_eq!(requests[0].count, 8);
    assert_eq!(requests[0].query, "Wie lege ich einen Kalender an?");
}

#[tokio::test]
async fn test_same_source_expansion_for_complex() {
    let (service, source) = service(
        MockCandidateSource::new()
            .with_chunks("a.pdf", ExpansionScope::SameSource, vec![chunk("a.pdf", 20, 0.25)])
            .with_chunks("a.pdf", ExpansionScope::Neighbors, vec![chunk("a.pdf", 2, 0.3)]),
    );

    let outcome = service
        .expand(
            vec![chunk("a.pdf", 1, 0.3)],
            &query(QueryType::Complex),
            &thresholds(5, 15, 0.45),
        )
        .await;

    assert_eq!(outcome.strategy, Some(ExpansionStrategy::SameSource));
    assert_eq!(outcome.added, 1);
    assert!(
        source
            .requests()
            .iter()
            .all(|r| r.scope == ExpansionScope::SameSource)
    );
}

#[tokio::test]
async fn test_progressive_tries_neighbors_then_same_source() {
    let (service, source) = service(
        MockCandidateSource::new()
            .with_chunks("a.pdf", ExpansionScope::Neighbors, vec![chunk("a.pdf", 2, 0.3)])
            .with_chunks("a.pdf", ExpansionScope::SameSource, vec![chunk("a.pdf", 9, 0.2)]),
    );

    let outcome = service
        .expand(
            vec![chunk("a.pdf", 1, 0.3)],
            &query(QueryType::Short),
            &thresholds(2, 6, 0.4),
        )
        .await;

    assert_eq!(outcome.strategy, Some(ExpansionStrategy::Progressive));
    assert_eq!(outcome.added, 2);
    let scopes: Vec<ExpansionScope> = source.requests().iter().map(|r| r.scope).collect();
    assert_eq!(
        scopes,
        vec![ExpansionScope::Neighbors, ExpansionScope::SameSource]
    );
}

#[tokio::test]
async fn test_progressive_stops_when_full() {
    let neighbours: Vec<Candidate> = (2..8).map(|i| chunk("a.pdf", i, 0.3)).collect();
    let (service, source) = service(
        MockCandidateSource::new()
            .with_chunks("a.pdf", ExpansionScope::Neighbors, neighbours)
            .with_chunks("a.pdf", ExpansionScope::SameSource, vec![chunk("a.pdf", 9, 0.2)]),
    );

    let outcome = service
        .expand(
            vec![chunk("a.pdf", 1, 0.3)],
            &query(QueryType::Short),
            &thresholds(2, 4, 0.4),
        )
        .await;

    assert_eq!(outcome.candidates.len(), 4);
    assert_eq!(source.requests().len(), 1, "same-source step skipped once full");
}

#[tokio::test]
async fn test_full_weak_set_still_fetches_first_scope() {
    let weak: Vec<Candidate> = (0..12)
        .map(|i| chunk("a.pdf", i, 0.36 + i as f32 * 0.008))
        .collect();
    let (service, source) = service(MockCandidateSource::new().with_chunks(
        "a.pdf",
        ExpansionScope::Neighbors,
        vec![chunk("a.pdf", 99, 0.9)],
    ));

    let outcome = service
        .expand(weak, &query(QueryType::WhatIs), &thresholds(4, 12, 0.5))
        .await;

    assert_eq!(source.requests().len(), 1);
    assert!(outcome.expanded);
    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.candidates.len(), 12);
    assert_eq!(outcome.candidates[0].content, "a.pdf chunk 99");
    assert!(outcome.candidates.iter().all(|c| c.similarity_score > 0.36));
}

#[tokio::test]
async fn test_failed_fetch_is_skipped() {
    let (service, source) = service(
        MockCandidateSource::new()
            .with_failing_source("broken.pdf")
            .with_chunks("ok.pdf", ExpansionScope::Neighbors, vec![chunk("ok.pdf", 2, 0.2)]),
    );

    let outcome = service
        .expand(
            vec![chunk("broken.pdf", 1, 0.3), chunk("ok.pdf", 1, 0.25)],
            &query(QueryType::WhatIs),
            &thresholds(3, 9, 0.5),
        )
        .await;

    assert_eq!(source.requests().len(), 2);
    assert!(outcome.expanded);
    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.candidates.len(), 3);
}

#[tokio::test]
async fn test_sources_requested_best_first() {
    let (service, source) = service(MockCandidateSource::new());

    service
        .expand(
            vec![
                chunk("low.pdf", 1, 0.1),
                chunk("high.pdf", 1, 0.4),
                chunk("low.pdf", 2, 0.05),
            ],
            &query(QueryType::WhatIs),
            &thresholds(3, 9, 0.5),
        )
        .await;

    let sources: Vec<String> = source.requests().into_iter().map(|r| r.source).collect();
    assert_eq!(sources, vec!["high.pdf".to_string(), "low.pdf".to_string()]);
}

#[tokio::test]
async fn test_nothing_new_is_not_expanded() {
    let (service, _) = service(MockCandidateSource::new().with_chunks(
        "a.pdf",
        ExpansionScope::Neighbors,
        vec![chunk("a.pdf", 1, 0.1)],
    ));

    let outcome = service
        .expand(
            vec![chunk("a.pdf", 1, 0.3)],
            &query(QueryType::WhatIs),
            &thresholds(3, 9, 0.5),
        )
        .await;

    assert_eq!(outcome.strategy, Some(ExpansionStrategy::Neighbors));
    assert!(!outcome.expanded);
    assert_eq!(outcome.candidates.len(), 1);
    assert_eq!(outcome.candidates[0].similarity_score, 0.3);
}

#[test]
fn test_merge_dedupes_keeping_higher_score() {
    let merged = merge_candidates(
        vec![
            chunk("a.pdf", 1, 0.3),
            chunk("b.pdf", 1, 0.5),
            chunk("a.pdf", 1, 0.6),
            chunk("a.pdf", 2, 0.1),
        ],
        10,
    );

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].content, "a.pdf chunk 1");
    assert_eq!(merged[0].similarity_score, 0.6);
    assert_eq!(merged[2].similarity_score, 0.1);
}

#[test]
fn test_merge_same_content_different_source_kept() {
    let merged = merge_candidates(
        vec![
            Candidate::new("Kalender anlegen", "a.pdf", 0.4),
            Candidate::new("Kalender anlegen", "b.pdf", 0.4),
        ],
        10,
    );
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_caps_results() {
    let pool: Vec<Candidate> = (0..10).map(|i| chunk("a.pdf", i, i as f32 / 10.0)).collect();
    let merged = merge_candidates(pool, 4);
    assert_eq!(merged.len(), 4);
    assert_eq!(merged[0].similarity_score, 0.9);
}
