use std::collections::{HashMap, VecDeque};

use super::types::FusionStrategy;

/// Provider quality history, strategy usage and the latest weights.
///
/// Owned by one [`super::EnsembleReranker`] behind a lock; never held across an await.
#[derive(Debug, Default)]
pub(crate) struct PerformanceState {
    histories: HashMap<String, VecDeque<f32>>,
    strategy_usage: HashMap<FusionStrategy, u64>,
    current_weights: HashMap<String, f32>,
}

impl PerformanceState {
    /// Appends `quality` to `provider`'s window and returns the window contents.
    pub(crate) fn record_quality(&mut self, provider: &str, quality: f32, window: usize) -> Vec<f32> {
        let history = self.histories.entry(provider.to_string()).or_default();
        history.push_back(quality);
        while history.len() > window {
            history.pop_front();
        }
        history.iter().copied().collect()
    }

    pub(crate) fn history(&self, provider: &str) -> Vec<f32> {
        self.histories
            .get(provider)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn record_strategy(&mut self, strategy: FusionStrategy) {
        *self.strategy_usage.entry(strategy).or_insert(0) += 1;
    }

    pub(crate) fn strategy_usage(&self) -> &HashMap<FusionStrategy, u64> {
        &self.strategy_usage
    }

    pub(crate) fn set_weights(&mut self, weights: HashMap<String, f32>) {
        self.current_weights = weights;
    }

    pub(crate) fn weights(&self) -> &HashMap<String, f32> {
        &self.current_weights
    }

    pub(crate) fn reset(&mut self) {
        self.histories.clear();
        self.strategy_usage.clear();
        self.current_weights.clear();
    }
}
