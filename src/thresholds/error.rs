use thiserror::Error;

use crate::query::QueryType;

/// Invalid threshold configuration.
///
/// Raised when a [`super::ThresholdManager`] is built. Every adjusted row is checked
/// there, so [`super::ThresholdManager::get_thresholds`] never sees an inversion.
#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("{name} threshold {value} outside valid range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error(
        "thresholds must satisfy fallback < good_quality < high_quality \
         (got {fallback} / {good_quality} / {high_quality})"
    )]
    Inverted {
        high_quality: f32,
        good_quality: f32,
        fallback: f32,
    },

    #[error(
        "adjusted thresholds for {query_type} (complexity {complexity}, density {density}) \
         must satisfy fallback < good_quality < high_quality \
         (got {fallback} / {good_quality} / {high_quality})"
    )]
    AdjustedInversion {
        query_type: QueryType,
        complexity: f32,
        density: f32,
        high_quality: f32,
        good_quality: f32,
        fallback: f32,
    },

    #[error("invalid adjustment for {query_type}: {reason}")]
    InvalidAdjustment { query_type: QueryType, reason: String },
}
