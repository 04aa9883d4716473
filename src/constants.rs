//! Cross-cutting, shared constants.
//!
//! Component configs ([`crate::thresholds::ThresholdConfig`], [`crate::cache::CacheConfig`],
//! [`crate::ensemble::EnsembleConfig`]) take their defaults from here so the environment
//! layer in [`crate::config`] and the components never drift apart.
//!
//! # Threshold Invariants
//!
//! The base similarity thresholds must satisfy `fallback < good < high`. The clamp ranges
//! below are chosen so that, starting from the defaults, no combination of per-type and
//! continuous adjustments can invert that order.

pub const DEFAULT_HIGH_QUALITY_THRESHOLD: f32 = 0.70;
pub const DEFAULT_GOOD_QUALITY_THRESHOLD: f32 = 0.30;
pub const DEFAULT_FALLBACK_THRESHOLD: f32 = 0.15;

pub const HIGH_QUALITY_RANGE: (f32, f32) = (0.5, 0.9);
pub const GOOD_QUALITY_RANGE: (f32, f32) = (0.2, 0.6);
pub const FALLBACK_RANGE: (f32, f32) = (0.05, 0.3);

/// Hard ceiling on `max_results`, regardless of `min_results`.
pub const MAX_RESULTS_CAP: usize = 15;
pub const MAX_RESULTS_MULTIPLIER: usize = 3;

pub const DEFAULT_CACHE_SIZE: usize = 10_000;
pub const DEFAULT_SEMANTIC_CACHE_SIZE: usize = 1_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;
pub const DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD: f32 = 0.95;

pub const DEFAULT_WEIGHT_FLOOR: f32 = 0.05;
pub const DEFAULT_HISTORY_WINDOW: usize = 10;
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;

/// Tolerance used when checking that weight vectors sum to one.
pub const WEIGHT_SUM_EPSILON: f32 = 1e-4;

/// Clamps `value` into an inclusive `(min, max)` range.
#[inline]
pub fn clamp_to(value: f32, range: (f32, f32)) -> f32 {
    value.clamp(range.0, range.1)
}
