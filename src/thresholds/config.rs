use std::collections::HashMap;

use crate::constants::{
    DEFAULT_FALLBACK_THRESHOLD, DEFAULT_GOOD_QUALITY_THRESHOLD, DEFAULT_HIGH_QUALITY_THRESHOLD,
    FALLBACK_RANGE, GOOD_QUALITY_RANGE, HIGH_QUALITY_RANGE, MAX_RESULTS_CAP,
    MAX_RESULTS_MULTIPLIER, clamp_to,
};
use crate::query::QueryType;

use super::error::ThresholdError;
use super::types::AdaptiveThresholds;

/// Complexity and density values that reach every branch of the continuous nudges.
const NUDGE_SAMPLES: [f32; 3] = [0.0, 0.5, 1.0];

/// Per-type adjustment: additive deltas plus fixed result count and expansion trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeAdjustment {
    pub high_delta: f32,
    pub good_delta: f32,
    pub fallback_delta: f32,
    pub min_results: usize,
    pub context_expansion_trigger: f32,
}

impl TypeAdjustment {
    pub const fn new(
        high_delta: f32,
        good_delta: f32,
        fallback_delta: f32,
        min_results: usize,
        context_expansion_trigger: f32,
    ) -> Self {
        Self {
            high_delta,
            good_delta,
            fallback_delta,
            min_results,
            context_expansion_trigger,
        }
    }
}

/// Continuous nudges driven by complexity and semantic density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousAdjustment {
    pub high_complexity: f32,
    pub low_complexity: f32,
    pub complexity_step: f32,
    pub high_density: f32,
    pub low_density: f32,
    pub density_high_step: f32,
    pub density_good_step: f32,
    pub density_fallback_step: f32,
}

impl Default for ContinuousAdjustment {
    fn default() -> Self {
        Self {
            high_complexity: 0.7,
            low_complexity: 0.3,
            complexity_step: 0.05,
            high_density: 0.8,
            low_density: 0.4,
            density_high_step: 0.05,
            density_good_step: 0.05,
            density_fallback_step: 0.03,
        }
    }
}

/// Base thresholds and the per-type adjustment table.
#[derive(Debug, Clone)]
pub struct ThresholdConfig {
    pub high_quality: f32,
    pub good_quality: f32,
    pub fallback: f32,
    pub adjustments: HashMap<QueryType, TypeAdjustment>,
    pub continuous: ContinuousAdjustment,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high_quality: DEFAULT_HIGH_QUALITY_THRESHOLD,
            good_quality: DEFAULT_GOOD_QUALITY_THRESHOLD,
            fallback: DEFAULT_FALLBACK_THRESHOLD,
            adjustments: default_adjustments(),
            continuous: ContinuousAdjustment::default(),
        }
    }
}

impl ThresholdConfig {
    pub fn with_base(high_quality: f32, good_quality: f32, fallback: f32) -> Self {
        Self {
            high_quality,
            good_quality,
            fallback,
            ..Default::default()
        }
    }

    /// Adjustment for `query_type`, falling back to the `GENERAL` row.
    pub fn adjustment(&self, query_type: QueryType) -> TypeAdjustment {
        self.adjustments
            .get(&query_type)
            .or_else(|| self.adjustments.get(&QueryType::General))
            .copied()
            .unwrap_or(GENERAL_ADJUSTMENT)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        check_range("high_quality", self.high_quality, HIGH_QUALITY_RANGE)?;
        check_range("good_quality", self.good_quality, GOOD_QUALITY_RANGE)?;
        check_range("fallback", self.fallback, FALLBACK_RANGE)?;

        if !(self.fallback < self.good_quality && self.good_quality < self.high_quality) {
            return Err(ThresholdError::Inverted {
                high_quality: self.high_quality,
                good_quality: self.good_quality,
                fallback: self.fallback,
            });
        }

        for (query_type, adjustment) in &self.adjustments {
            if adjustment.min_results == 0 || adjustment.min_results > MAX_RESULTS_CAP {
                return Err(ThresholdError::InvalidAdjustment {
                    query_type: *query_type,
                    reason: format!(
                        "min_results must be between 1 and {}, got {}",
                        MAX_RESULTS_CAP, adjustment.min_results
                    ),
                });
            }
            if !(0.0..=1.0).contains(&adjustment.context_expansion_trigger) {
                return Err(ThresholdError::InvalidAdjustment {
                    query_type: *query_type,
                    reason: format!(
                        "context_expansion_trigger must be between 0.0 and 1.0, got {}",
                        adjustment.context_expansion_trigger
                    ),
                });
            }
        }

        for query_type in QueryType::ALL {
            for complexity in NUDGE_SAMPLES {
                for density in NUDGE_SAMPLES {
                    let t = self.resolve(query_type, complexity, density);
                    if !t.is_ordered() {
                        return Err(ThresholdError::AdjustedInversion {
                            query_type,
                            complexity,
                            density,
                            high_quality: t.high_quality,
                            good_quality: t.good_quality,
                            fallback: t.fallback,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies the type row and the continuous nudges, then clamps. Order is not checked.
    pub fn resolve(
        &self,
        query_type: QueryType,
        complexity: f32,
        density: f32,
    ) -> AdaptiveThresholds {
        let adjustment = self.adjustment(query_type);
        let continuous = &self.continuous;

        let mut high = self.high_quality + adjustment.high_delta;
        let mut good = self.good_quality + adjustment.good_delta;
        let mut fallback = self.fallback + adjustment.fallback_delta;

        if complexity > continuous.high_complexity {
            high += continuous.complexity_step;
            good += continuous.complexity_step;
        } else if complexity < continuous.low_complexity {
            high -= continuous.complexity_step;
            good -= continuous.complexity_step;
        }

        if density > continuous.high_density {
            high += continuous.density_high_step;
        } else if density < continuous.low_density {
            good -= continuous.density_good_step;
            fallback -= continuous.density_fallback_step;
        }

        let min_results = adjustment.min_results.max(1);
        AdaptiveThresholds {
            high_quality: clamp_to(high, HIGH_QUALITY_RANGE),
            good_quality: clamp_to(good, GOOD_QUALITY_RANGE),
            fallback: clamp_to(fallback, FALLBACK_RANGE),
            min_results,
            max_results: (min_results * MAX_RESULTS_MULTIPLIER).min(MAX_RESULTS_CAP),
            context_expansion_trigger: adjustment.context_expansion_trigger.clamp(0.0, 1.0),
        }
    }
}

fn check_range(name: &'static str, value: f32, range: (f32, f32)) -> Result<(), ThresholdError> {
    if !(range.0..=range.1).contains(&value) {
        return Err(ThresholdError::OutOfRange {
            name,
            value,
            min: range.0,
            max: range.1,
        });
    }
    Ok(())
}

const GENERAL_ADJUSTMENT: TypeAdjustment = TypeAdjustment::new(0.0, 0.0, 0.0, 3, 0.5);

/// Built-in adjustment table.
///
/// Precise question types tighten thresholds and need fewer results; vague or broad ones
/// loosen thresholds, ask for more results and expand earlier.
pub fn default_adjustments() -> HashMap<QueryType, TypeAdjustment> {
    HashMap::from([
        (QueryType::WhatIs, TypeAdjustment::new(0.05, 0.05, 0.0, 3, 0.5)),
        (QueryType::HowDoes, TypeAdjustment::new(0.0, 0.0, 0.0, 4, 0.5)),
        (QueryType::WhereIs, TypeAdjustment::new(0.05, 0.05, 0.05, 2, 0.55)),
        (QueryType::Why, TypeAdjustment::new(-0.05, -0.05, 0.0, 4, 0.45)),
        (QueryType::WhoIs, TypeAdjustment::new(0.05, 0.05, 0.05, 2, 0.55)),
        (QueryType::Definition, TypeAdjustment::new(0.05, 0.1, 0.05, 2, 0.55)),
        (QueryType::Comparison, TypeAdjustment::new(-0.05, -0.05, -0.03, 5, 0.45)),
        (QueryType::Procedure, TypeAdjustment::new(0.0, -0.05, -0.02, 5, 0.5)),
        (QueryType::Factual, TypeAdjustment::new(0.1, 0.1, 0.05, 2, 0.6)),
        (QueryType::Short, TypeAdjustment::new(-0.1, -0.1, -0.05, 2, 0.4)),
        (QueryType::Complex, TypeAdjustment::new(-0.05, -0.05, -0.05, 5, 0.45)),
        (QueryType::General, GENERAL_ADJUSTMENT),
    ])
}
