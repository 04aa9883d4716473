use tracing::debug;

use crate::query::Query;

use super::config::ThresholdConfig;
use super::error::ThresholdError;
use super::types::AdaptiveThresholds;

/// Converts base quality thresholds into query-specific thresholds.
#[derive(Debug, Clone)]
pub struct ThresholdManager {
    config: ThresholdConfig,
}

impl ThresholdManager {
    /// Creates a manager after validating base thresholds and every adjusted row.
    pub fn new(config: ThresholdConfig) -> Result<Self, ThresholdError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Computes thresholds for an analyzed query.
    ///
    /// # Panics
    ///
    /// Panics if the adjusted thresholds are not strictly ordered
    /// (`fallback < good_quality < high_quality`). [`ThresholdConfig::validate`] rejects
    /// such tables, so this only fires if the nudges are bypassed.
    pub fn get_thresholds(&self, query: &Query) -> AdaptiveThresholds {
        let thresholds = self.config.resolve(
            query.query_type(),
            query.complexity_score(),
            query.semantic_density(),
        );

        assert!(
            thresholds.is_ordered(),
            "threshold inversion for {}: fallback={} good={} high={}",
            query.query_type(),
            thresholds.fallback,
            thresholds.good_quality,
            thresholds.high_quality
        );

        debug!(
            query_type = %query.query_type(),
            high = thresholds.high_quality,
            good = thresholds.good_quality,
            fallback = thresholds.fallback,
            min_results = thresholds.min_results,
            max_results = thresholds.max_results,
            trigger = thresholds.context_expansion_trigger,
            "Computed adaptive thresholds"
        );

        thresholds
    }
}

impl Default for ThresholdManager {
    fn default() -> Self {
        Self {
            config: ThresholdConfig::default(),
        }
    }
}
