//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RAGSIFT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::constants::{
    DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_SECS, DEFAULT_FALLBACK_THRESHOLD,
    DEFAULT_GOOD_QUALITY_THRESHOLD, DEFAULT_HIGH_QUALITY_THRESHOLD, DEFAULT_HISTORY_WINDOW,
    DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_SEMANTIC_CACHE_SIZE,
    DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD, DEFAULT_WEIGHT_FLOOR,
};
use crate::ensemble::EnsembleConfig;
use crate::thresholds::ThresholdConfig;

/// Retrieval-core configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAGSIFT_*` overrides on top of defaults. The
/// component configs are derived with [`Config::threshold_config`],
/// [`Config::cache_config`] and [`Config::ensemble_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base high-quality similarity threshold. Default: `0.70`.
    pub high_quality: f32,

    /// Base good-quality similarity threshold. Default: `0.30`.
    pub good_quality: f32,

    /// Base fallback similarity threshold. Default: `0.15`.
    pub fallback: f32,

    /// Max entries in the exact embedding tier. Default: `10_000`.
    pub cache_size: usize,

    /// Max entries in the semantic embedding tier. Default: `1_000`.
    pub semantic_cache_size: usize,

    /// Embedding lifetime in seconds. Default: `3600`.
    pub cache_ttl_secs: u64,

    /// Cosine similarity needed for a semantic cache hit. Default: `0.95`.
    pub semantic_threshold: f32,

    /// Minimum provider weight. Default: `0.05`.
    pub weight_floor: f32,

    /// Quality samples kept per provider. Default: `10`.
    pub history_window: usize,

    /// Per-provider scoring deadline in milliseconds. Default: `5000`.
    pub provider_timeout_ms: u64,

    /// Optional JSON pattern table replacing the built-in one.
    pub patterns_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            high_quality: DEFAULT_HIGH_QUALITY_THRESHOLD,
            good_quality: DEFAULT_GOOD_QUALITY_THRESHOLD,
            fallback: DEFAULT_FALLBACK_THRESHOLD,
            cache_size: DEFAULT_CACHE_SIZE,
            semantic_cache_size: DEFAULT_SEMANTIC_CACHE_SIZE,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            semantic_threshold: DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
            weight_floor: DEFAULT_WEIGHT_FLOOR,
            history_window: DEFAULT_HISTORY_WINDOW,
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            patterns_path: None,
        }
    }
}

impl Config {
    const ENV_HIGH_QUALITY: &'static str = "RAGSIFT_HIGH_QUALITY";
    const ENV_GOOD_QUALITY: &'static str = "RAGSIFT_GOOD_QUALITY";
    const ENV_FALLBACK: &'static str = "RAGSIFT_FALLBACK";
    const ENV_CACHE_SIZE: &'static str = "RAGSIFT_CACHE_SIZE";
    const ENV_SEMANTIC_CACHE_SIZE: &'static str = "RAGSIFT_SEMANTIC_CACHE_SIZE";
    const ENV_CACHE_TTL_SECS: &'static str = "RAGSIFT_CACHE_TTL_SECS";
    const ENV_SEMANTIC_THRESHOLD: &'static str = "RAGSIFT_SEMANTIC_THRESHOLD";
    const ENV_WEIGHT_FLOOR: &'static str = "RAGSIFT_WEIGHT_FLOOR";
    const ENV_HISTORY_WINDOW: &'static str = "RAGSIFT_HISTORY_WINDOW";
    const ENV_PROVIDER_TIMEOUT_MS: &'static str = "RAGSIFT_PROVIDER_TIMEOUT_MS";
    const ENV_PATTERNS_PATH: &'static str = "RAGSIFT_PATTERNS_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Malformed numbers are errors. Ranges are checked by [`Config::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            high_quality: Self::parse_f32_from_env(Self::ENV_HIGH_QUALITY, defaults.high_quality)?,
            good_quality: Self::parse_f32_from_env(Self::ENV_GOOD_QUALITY, defaults.good_quality)?,
            fallback: Self::parse_f32_from_env(Self::ENV_FALLBACK, defaults.fallback)?,
            cache_size: Self::parse_int_from_env(Self::ENV_CACHE_SIZE, defaults.cache_size)?,
            semantic_cache_size: Self::parse_int_from_env(
                Self::ENV_SEMANTIC_CACHE_SIZE,
                defaults.semantic_cache_size,
            )?,
            cache_ttl_secs: Self::parse_int_from_env(
                Self::ENV_CACHE_TTL_SECS,
                defaults.cache_ttl_secs,
            )?,
            semantic_threshold: Self::parse_f32_from_env(
                Self::ENV_SEMANTIC_THRESHOLD,
                defaults.semantic_threshold,
            )?,
            weight_floor: Self::parse_f32_from_env(Self::ENV_WEIGHT_FLOOR, defaults.weight_floor)?,
            history_window: Self::parse_int_from_env(
                Self::ENV_HISTORY_WINDOW,
                defaults.history_window,
            )?,
            provider_timeout_ms: Self::parse_int_from_env(
                Self::ENV_PROVIDER_TIMEOUT_MS,
                defaults.provider_timeout_ms,
            )?,
            patterns_path: Self::parse_optional_path_from_env(Self::ENV_PATTERNS_PATH),
        })
    }

    /// Checks ranges, threshold order and the pattern file path (does not read the file).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold_config().validate()?;
        self.cache_config().validate()?;
        self.ensemble_config().validate()?;

        if let Some(ref path) = self.patterns_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn threshold_config(&self) -> ThresholdConfig {
        ThresholdConfig::with_base(self.high_quality, self.good_quality, self.fallback)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_cache_size: self.cache_size,
            semantic_cache_size: self.semantic_cache_size,
            ttl: Duration::from_secs(self.cache_ttl_secs),
            similarity_threshold: self.semantic_threshold,
        }
    }

    pub fn ensemble_config(&self) -> EnsembleConfig {
        EnsembleConfig {
            weight_floor: self.weight_floor,
            history_window: self.history_window,
            provider_timeout: Duration::from_millis(self.provider_timeout_ms),
            ..Default::default()
        }
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::FloatParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_int_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
