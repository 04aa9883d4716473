//! End-to-end tests for the retrieval pipeline using real providers and mock backends.

mod common;

use common::fixtures::{CandidateBuilder, DEFAULT_SOURCE, candidates_with_scores, export_corpus};
use ragsift::{
    CachedEmbedder, CandidateSource, Config, EmbeddingCacheHandle, EmbeddingSimilarityProvider,
    ExpansionScope, FailingProvider, LexicalProvider, MockCandidateSource, MockEmbedder,
    QualityTier, QueryType, RetrievalPipeline, ScoringProvider, SlowProvider,
};
use std::sync::Arc;
use std::time::Duration;

const EXPORT_QUERY: &str = "Wie exportiere ich Berichte aus StreamWorks?";

fn lexical_pipeline() -> RetrievalPipeline {
    let providers: Vec<Arc<dyn ScoringProvider>> = vec![Arc::new(LexicalProvider::new())];
    RetrievalPipeline::from_config(&Config::default(), providers, None).expect("pipeline")
}

#[tokio::test]
async fn test_lexical_ranking_surfaces_relevant_chunk() {
    let pipeline = lexical_pipeline();

    let response = pipeline.process(EXPORT_QUERY, export_corpus()).await;

    assert_eq!(response.metadata.original_count, 3);
    assert_eq!(response.metadata.final_count, 3);
    assert!(!response.metadata.ensemble_failed);
    assert!(response.candidates[0].content.contains("exportiere"));
    assert_eq!(
        response.candidates[0].metadata.get("page").map(String::as_str),
        Some("12")
    );

    let top = &response.candidates[0];
    let expected = 0.7 * top.rerank_score.unwrap() + 0.3 * top.similarity_score;
    assert!((top.composite_score.unwrap() - expected).abs() < 1e-6);
}

#[tokio::test]
async fn test_embedding_provider_reuses_cache_across_queries() {
    let mock = Arc::new(MockEmbedder::new(32));
    let cache = EmbeddingCacheHandle::default();
    let embedder = Arc::new(CachedEmbedder::new(mock.clone(), cache.clone()));

    let providers: Vec<Arc<dyn ScoringProvider>> = vec![
        Arc::new(LexicalProvider::new()),
        Arc::new(EmbeddingSimilarityProvider::new(embedder)),
    ];
    let pipeline =
        RetrievalPipeline::from_config(&Config::default(), providers, None).expect("pipeline");

    let first = pipeline.process(EXPORT_QUERY, export_corpus()).await;
    let embedded_after_first = mock.embedded_texts();
    let second = pipeline.process(EXPORT_QUERY, export_corpus()).await;

    assert_eq!(embedded_after_first, 4, "query plus three chunks");
    assert_eq!(mock.embedded_texts(), embedded_after_first);
    assert!(cache.stats().hits >= 4);
    assert_eq!(cache.len(), 4);

    assert_eq!(first.metadata.final_count, second.metadata.final_count);
    assert_eq!(
        pipeline.reranker().provider_history("embedding").len(),
        2,
        "one quality sample per round"
    );
}

#[tokio::test]
async fn test_short_query_high_tier_scenario() {
    let pipeline = lexical_pipeline();

    let response = pipeline
        .process("Was ist StreamWorks?", candidates_with_scores(&[0.9, 0.85, 0.4, 0.3, 0.1]))
        .await;

    let meta = response.metadata;
    assert_eq!(meta.query_type, QueryType::Short);
    assert_eq!(meta.quality_tier_used, QualityTier::High);
    assert_eq!(meta.thresholds_used.min_results, 2);
    assert!((meta.thresholds_used.context_expansion_trigger - 0.4).abs() < 1e-6);
    assert!(!meta.context_expanded);
    assert_eq!(meta.final_count, 2);
}

#[tokio::test]
async fn test_thin_context_is_expanded_from_source() {
    let neighbours = vec![
        CandidateBuilder::new()
            .content("StreamWorks ist eine Plattform für Video-Streaming im Unternehmen.")
            .similarity(0.33)
            .page(2)
            .build(),
        CandidateBuilder::new()
            .content("StreamWorks wird zentral von der IT betrieben.")
            .similarity(0.31)
            .page(3)
            .build(),
    ];
    let source = Arc::new(MockCandidateSource::new().with_chunks(
        DEFAULT_SOURCE,
        ExpansionScope::Neighbors,
        neighbours,
    ));

    let providers: Vec<Arc<dyn ScoringProvider>> = vec![Arc::new(LexicalProvider::new())];
    let pipeline = RetrievalPipeline::from_config(
        &Config::default(),
        providers,
        Some(source.clone() as Arc<dyn CandidateSource>),
    )
    .expect("pipeline");

    let response = pipeline
        .process("Was ist StreamWorks?", candidates_with_scores(&[0.3, 0.28]))
        .await;

    assert!(response.metadata.context_expanded);
    assert_eq!(response.metadata.final_count, 4);

    let requests = source.requests();
    assert_eq!(requests[0].source, DEFAULT_SOURCE);
    assert_eq!(requests[0].query, "Was ist StreamWorks?");
    assert_eq!(requests[0].scope, ExpansionScope::Neighbors);
}

#[tokio::test]
async fn test_degrades_when_providers_fail_or_stall() {
    let config = Config {
        provider_timeout_ms: 50,
        ..Default::default()
    };
    let providers: Vec<Arc<dyn ScoringProvider>> = vec![
        Arc::new(FailingProvider::new("broken")),
        Arc::new(SlowProvider::new("stalled", Duration::from_millis(500), 0.9)),
    ];
    let pipeline = RetrievalPipeline::from_config(&config, providers, None).expect("pipeline");

    let response = pipeline.process(EXPORT_QUERY, export_corpus()).await;

    assert!(response.metadata.ensemble_failed);
    assert_eq!(response.metadata.fusion_strategy, None);
    let similarities: Vec<f32> = response
        .candidates
        .iter()
        .map(|c| c.similarity_score)
        .collect();
    assert_eq!(similarities, vec![0.58, 0.55, 0.5]);
}

#[tokio::test]
async fn test_one_failing_provider_is_tolerated() {
    let providers: Vec<Arc<dyn ScoringProvider>> = vec![
        Arc::new(LexicalProvider::new()),
        Arc::new(FailingProvider::new("broken")),
    ];
    let pipeline =
        RetrievalPipeline::from_config(&Config::default(), providers, None).expect("pipeline");

    let response = pipeline.process(EXPORT_QUERY, export_corpus()).await;

    assert!(!response.metadata.ensemble_failed);
    assert!(response.candidates[0].content.contains("exportiere"));
    let weights = pipeline.reranker().current_weights();
    assert!(weights.contains_key("lexical"));
    assert!(!weights.contains_key("broken"));
}

#[tokio::test]
async fn test_concurrent_queries_share_state() {
    let pipeline = Arc::new(lexical_pipeline());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.process(EXPORT_QUERY, export_corpus()).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.expect("task");
        assert_eq!(response.metadata.final_count, 3);
    }

    let total: u64 = pipeline.reranker().strategy_usage().values().sum();
    assert_eq!(total, 8);
    assert_eq!(pipeline.reranker().provider_history("lexical").len(), 8);
}
