//! Adaptive similarity thresholds and quality-tier selection.
//!
//! [`ThresholdManager::get_thresholds`] starts from the base thresholds, applies the
//! per-type adjustment row, then complexity/density nudges, and clamps each threshold to
//! its valid range. [`select_candidates`] applies the resulting tiers to a candidate set.

pub mod config;
pub mod error;
pub mod manager;
pub mod selection;
pub mod types;


pub use config::{ContinuousAdjustment, ThresholdConfig, TypeAdjustment, default_adjustments};
pub use error::ThresholdError;
pub use manager::ThresholdManager;
pub use selection::select_candidates;
pub use types::{AdaptiveThresholds, QualityTier, TierSelection};
