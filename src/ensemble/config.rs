use std::collections::HashMap;
use std::time::Duration;

use crate::constants::{DEFAULT_HISTORY_WINDOW, DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_WEIGHT_FLOOR};

use super::error::EnsembleError;
use super::types::FusionStrategy;

/// Tunables for an [`super::EnsembleReranker`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleConfig {
    /// Minimum weight any succeeding provider receives. Default: `0.05`.
    pub weight_floor: f32,
    /// Quality samples kept per provider. Default: `10`.
    pub history_window: usize,
    /// Per-provider deadline for one scoring call. Default: 5 s.
    pub provider_timeout: Duration,
    /// Prior weight per provider name. Providers not listed get `1 / provider_count`.
    pub initial_weights: HashMap<String, f32>,
    /// Always use this strategy instead of selecting one per round.
    pub fixed_strategy: Option<FusionStrategy>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            weight_floor: DEFAULT_WEIGHT_FLOOR,
            history_window: DEFAULT_HISTORY_WINDOW,
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            initial_weights: HashMap::new(),
            fixed_strategy: None,
        }
    }
}

impl EnsembleConfig {
    pub fn with_fixed_strategy(mut self, strategy: FusionStrategy) -> Self {
        self.fixed_strategy = Some(strategy);
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), EnsembleError> {
        if !(0.0..1.0).contains(&self.weight_floor) {
            return Err(EnsembleError::InvalidConfig {
                reason: format!(
                    "weight_floor must be in [0.0, 1.0), got {}",
                    self.weight_floor
                ),
            });
        }
        if self.history_window == 0 {
            return Err(EnsembleError::InvalidConfig {
                reason: "history_window must be at least 1".to_string(),
            });
        }
        if self.provider_timeout.is_zero() {
            return Err(EnsembleError::InvalidConfig {
                reason: "provider_timeout must be greater than zero".to_string(),
            });
        }
        if let Some((name, weight)) = self
            .initial_weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(EnsembleError::InvalidConfig {
                reason: format!("initial weight for {name} must be finite and >= 0, got {weight}"),
            });
        }
        Ok(())
    }
}
