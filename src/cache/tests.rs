use super::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn small_config(max: usize, semantic: usize) -> CacheConfig {
    CacheConfig {
        max_cache_size: max,
        semantic_cache_size: semantic,
        ..Default::default()
    }
}

fn cache(max: usize, semantic: usize) -> EmbeddingCache {
    EmbeddingCache::new(small_config(max, semantic)).expect("valid cache config")
}

fn unit(x: f32, y: f32) -> Vec<f32> {
    let mut v = vec![x, y];
    normalize(&mut v);
    v
}

#[test]
fn test_default_config() {
    let config = CacheConfig::default();
    assert_eq!(config.max_cache_size, 10_000);
    assert_eq!(config.semantic_cache_size, 1_000);
    assert_eq!(config.ttl, Duration::from_secs(3600));
    assert!((config.similarity_threshold - 0.95).abs() < 1e-6);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_config_rejected() {
    assert!(EmbeddingCache::new(small_config(0, 10)).is_err());

    let config = CacheConfig {
        similarity_threshold: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(CacheError::InvalidConfig { .. })
    ));

    let config = CacheConfig {
        ttl: Duration::ZERO,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_put_then_get() {
    let cache = cache(10, 10);
    cache.put("Was ist StreamWorks?", vec![0.1, 0.2, 0.3]);

    assert_eq!(cache.get("Was ist StreamWorks?"), Some(vec![0.1, 0.2, 0.3]));
    assert_eq!(cache.get("Was ist Streamworks?"), None);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 0.5).abs() < 1e-9);
}

#[test]
fn test_hit_rate_without_lookups() {
    assert_eq!(CacheStats::default().hit_rate(), 0.0);
}

#[test]
fn test_exact_tier_bounded() {
    let cache = cache(3, 10);
    for i in 0..10 {
        cache.put(&format!("text {i}"), vec![i as f32]);
        assert!(cache.len() <= 3);
    }
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().evictions, 7);
}

#[test]
fn test_lru_evicts_least_recently_used() {
    let cache = cache(3, 10);
    cache.put("a", vec![1.0]);
    cache.put("b", vec![2.0]);
    cache.put("c", vec![3.0]);

    // Touch "a" so "b" becomes the oldest.
    assert!(cache.get("a").is_some());
    cache.put("d", vec![4.0]);

    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert!(cache.contains("c"));
    assert!(cache.contains("d"));
}

#[test]
fn test_reinsert_does_not_count_eviction() {
    let cache = cache(2, 10);
    cache.put("a", vec![1.0]);
    cache.put("a", vec![1.5]);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(cache.get("a"), Some(vec![1.5]));
}

#[test]
fn test_ttl_expires_on_get() {
    let cache = EmbeddingCache::new(CacheConfig {
        ttl: Duration::from_millis(40),
        ..Default::default()
    })
    .expect("valid cache config");

    cache.put("short lived", vec![1.0, 0.0]);
    assert!(cache.get("short lived").is_some());

    thread::sleep(Duration::from_millis(80));

    assert!(cache.get("short lived").is_none());
    assert_eq!(cache.len(), 0, "expired entry must be evicted on read");

    let stats = cache.stats();
    assert_eq!(stats.expirations, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_purge_expired_sweeps_both_tiers() {
    let cache = EmbeddingCache::new(CacheConfig {
        ttl: Duration::from_millis(40),
        ..Default::default()
    })
    .expect("valid cache config");

    cache.put("one", unit(1.0, 0.0));
    cache.put("two", unit(0.0, 1.0));
    thread::sleep(Duration::from_millis(80));
    cache.put("fresh", unit(1.0, 1.0));

    assert_eq!(cache.purge_expired(), 4);
    let stats = cache.stats();
    assert_eq!(stats.exact_entries, 1);
    assert_eq!(stats.semantic_entries, 1);
    assert!(cache.contains("fresh"));
}

#[test]
fn test_semantic_match_above_threshold() {
    let cache = cache(10, 10);
    cache.put("Wie starte ich einen Job?", unit(1.0, 0.0));
    cache.put("Was ist ein Kalender?", unit(0.0, 1.0));

    let found = cache
        .find_semantic_match(&unit(1.0, 0.05))
        .expect("near-identical vector should match");
    assert_eq!(found.text, "Wie starte ich einen Job?");
    assert!(found.similarity >= 0.95);
}

#[test]
fn test_semantic_match_below_threshold() {
    let cache = cache(10, 10);
    cache.put("Wie starte ich einen Job?", unit(1.0, 0.0));

    assert!(cache.find_semantic_match(&unit(1.0, 1.0)).is_none());
    let stats = cache.stats();
    assert_eq!(stats.semantic_misses, 1);
    assert_eq!(stats.semantic_hits, 0);
}

#[test]
fn test_semantic_match_picks_best() {
    let cache = cache(10, 10);
    cache.put("close", unit(1.0, 0.2));
    cache.put("closer", unit(1.0, 0.05));

    let found = cache
        .find_semantic_match(&unit(1.0, 0.0))
        .expect("should match");
    assert_eq!(found.text, "closer");
}

#[test]
fn test_semantic_tier_is_fifo() {
    let cache = cache(10, 2);
    cache.put("first", unit(1.0, 0.0));
    cache.put("second", unit(0.0, 1.0));
    // Reading does not protect an entry in the semantic tier.
    assert!(cache.find_semantic_match(&unit(1.0, 0.0)).is_some());
    cache.put("third", unit(-1.0, 0.0));

    assert!(cache.find_semantic_match(&unit(1.0, 0.0)).is_none());
    assert!(cache.find_semantic_match(&unit(0.0, 1.0)).is_some());
    assert_eq!(cache.stats().semantic_entries, 2);
    // Exact tier is unaffected by the semantic cap.
    assert!(cache.contains("first"));
}

#[test]
fn test_semantic_tier_disabled() {
    let cache = cache(10, 0);
    cache.put("text", unit(1.0, 0.0));
    assert!(cache.find_semantic_match(&unit(1.0, 0.0)).is_none());
    assert!(cache.get("text").is_some());
}

#[test]
fn test_clear_keeps_counters() {
    let cache = cache(10, 10);
    cache.put("a", vec![1.0]);
    cache.get("a");
    cache.clear();

    assert!(cache.is_empty());
    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.semantic_entries, 0);
}

#[test]
fn test_returned_vector_is_a_copy() {
    let cache = cache(10, 10);
    cache.put("a", vec![1.0, 2.0]);

    let mut first = cache.get("a").expect("hit");
    first[0] = 99.0;
    assert_eq!(cache.get("a"), Some(vec![1.0, 2.0]));
}

#[test]
fn test_handle_shares_cache() {
    let handle = EmbeddingCacheHandle::new(small_config(10, 10)).expect("valid cache config");
    let clone = handle.clone();
    assert_eq!(handle.strong_count(), 2);

    clone.put("shared", vec![0.5]);
    assert_eq!(handle.get("shared"), Some(vec![0.5]));
    assert_eq!(handle.len(), 1);
}

#[test]
fn test_concurrent_access_stays_bounded() {
    let handle = EmbeddingCacheHandle::new(small_config(50, 20)).expect("valid cache config");

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let handle = handle.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let text = format!("worker {worker} text {i}");
                    handle.put(&text, vec![worker as f32, i as f32]);
                    handle.get(&text);
                    handle.find_semantic_match(&[worker as f32, i as f32]);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let stats = handle.stats();
    assert!(stats.exact_entries <= 50);
    assert!(stats.semantic_entries <= 20);
    assert_eq!(stats.hits + stats.misses, 1600);
}

#[test]
fn test_cosine_similarity_edge_cases() {
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_cached_embedder_reuses_vectors() {
    let inner = Arc::new(MockEmbedder::new(16));
    let cache = EmbeddingCacheHandle::new(small_config(100, 100)).expect("valid cache config");
    let embedder = CachedEmbedder::new(inner.clone(), cache.clone());

    let texts = vec!["alpha".to_string(), "beta".to_string()];
    let first = embedder.embed(&texts).await.expect("embed");
    assert_eq!(inner.embedded_texts(), 2);

    let mixed = vec!["beta".to_string(), "gamma".to_string(), "alpha".to_string()];
    let second = embedder.embed(&mixed).await.expect("embed");

    assert_eq!(inner.embedded_texts(), 3, "only gamma is new");
    assert_eq!(second[0], first[1]);
    assert_eq!(second[2], first[0]);
    assert_eq!(second[1], inner.vector_for("gamma"));
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn test_cached_embedder_skips_inner_on_full_hit() {
    let inner = Arc::new(MockEmbedder::new(8));
    let embedder = CachedEmbedder::new(inner.clone(), EmbeddingCacheHandle::default());

    embedder.embed_one("Kalender").await.expect("embed");
    embedder.embed_one("Kalender").await.expect("embed");

    assert_eq!(inner.calls(), 1);
}

#[tokio::test]
async fn test_cached_embedder_reuses_near_duplicate_vector() {
    let inner = Arc::new(
        MockEmbedder::new(2)
            .with_vector("Was ist StreamWorks?", unit(1.0, 0.0))
            .with_vector("was ist streamworks ?", unit(1.0, 0.05))
            .with_vector("Kantine", unit(0.0, 1.0)),
    );
    let cache = EmbeddingCacheHandle::new(small_config(100, 100)).expect("valid cache config");
    let embedder = CachedEmbedder::new(inner.clone(), cache.clone());

    let original = embedder.embed_one("Was ist StreamWorks?").await.expect("embed");
    let variant = embedder.embed_one("was ist streamworks ?").await.expect("embed");
    let unrelated = embedder.embed_one("Kantine").await.expect("embed");

    assert_eq!(variant, original);
    assert_eq!(unrelated, unit(0.0, 1.0));
    assert_eq!(inner.embedded_texts(), 3);
    assert_eq!(cache.get("was ist streamworks ?"), Some(original));

    let stats = cache.stats();
    assert_eq!(stats.semantic_hits, 1);
    assert_eq!(stats.semantic_misses, 2);
}

#[tokio::test]
async fn test_cached_embedder_without_semantic_tier_keeps_fresh_vector() {
    let inner = Arc::new(
        MockEmbedder::new(2)
            .with_vector("a", unit(1.0, 0.0))
            .with_vector("b", unit(1.0, 0.05)),
    );
    let cache = EmbeddingCacheHandle::new(small_config(100, 0)).expect("valid cache config");
    let embedder = CachedEmbedder::new(inner, cache);

    embedder.embed_one("a").await.expect("embed");
    let b = embedder.embed_one("b").await.expect("embed");

    assert_eq!(b, unit(1.0, 0.05));
}

#[tokio::test]
async fn test_cached_embedder_propagates_failure() {
    let inner = Arc::new(MockEmbedder::new(8));
    inner.set_failing(true);
    let cache = EmbeddingCacheHandle::default();
    let embedder = CachedEmbedder::new(inner, cache.clone());

    let err = embedder.embed_one("Kalender").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::RequestFailed { .. }));
    assert!(cache.is_empty());
}

#[test]
fn test_mock_embedder_is_deterministic_unit_length() {
    let mock = MockEmbedder::new(24);
    let a = mock.vector_for("StreamWorks");
    let b = mock.vector_for("StreamWorks");
    let c = mock.vector_for("Kalender");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 24);
    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
fn test_http_embedder_requires_base_url() {
    assert!(matches!(
        HttpEmbedder::new("", "model"),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_http_embedder_orders_response_by_index() {
    let embedder = HttpEmbedder::new("http://localhost:8000/v1/", "e5").expect("embedder");
    let body = r#"{"data":[{"index":1,"embedding":[0.0,1.0]},{"index":0,"embedding":[1.0,0.0]}]}"#;

    let vectors = embedder.decode_response(2, body).expect("decode");
    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[test]
fn test_http_embedder_rejects_bad_responses() {
    let embedder = HttpEmbedder::new("http://localhost:8000/v1", "e5")
        .expect("embedder")
        .with_dimension(3);

    let short = r#"{"data":[{"index":0,"embedding":[1.0,0.0,0.0]}]}"#;
    assert!(matches!(
        embedder.decode_response(2, short),
        Err(EmbeddingError::InvalidResponse { .. })
    ));

    let wrong_dim = r#"{"data":[{"index":0,"embedding":[1.0,0.0]}]}"#;
    assert!(matches!(
        embedder.decode_response(1, wrong_dim),
        Err(EmbeddingError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));

    assert!(embedder.decode_response(1, "not json").is_err());
}
