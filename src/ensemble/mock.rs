//! Test providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::candidate::Candidate;

use super::error::ProviderError;
use super::provider::ScoringProvider;

/// Returns fixed scores, cycling through them if there are more candidates than scores.
#[derive(Debug)]
pub struct StaticProvider {
    name: String,
    scores: Vec<f32>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, scores: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            scores,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _query: &str, candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.scores.is_empty() {
            return Ok(vec![0.0; candidates.len()]);
        }
        Ok((0..candidates.len())
            .map(|i| self.scores[i % self.scores.len()])
            .collect())
    }
}

/// Always fails.
#[derive(Debug)]
pub struct FailingProvider {
    name: String,
}

impl FailingProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl ScoringProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _query: &str, _candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::Failed {
            provider: self.name.clone(),
            reason: "mock provider configured to fail".to_string(),
        })
    }
}

/// Sleeps before returning a constant score; used to exercise timeouts.
#[derive(Debug)]
pub struct SlowProvider {
    name: String,
    delay: Duration,
    score: f32,
}

impl SlowProvider {
    pub fn new(name: impl Into<String>, delay: Duration, score: f32) -> Self {
        Self {
            name: name.into(),
            delay,
            score,
        }
    }
}

#[async_trait]
impl ScoringProvider for SlowProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _query: &str, candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![self.score; candidates.len()])
    }
}

/// Returns whatever it was built with, regardless of candidate count.
#[derive(Debug)]
pub struct RawProvider {
    name: String,
    output: Vec<f32>,
}

impl RawProvider {
    pub fn new(name: impl Into<String>, output: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }
}

#[async_trait]
impl ScoringProvider for RawProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _query: &str, _candidates: &[Candidate]) -> Result<Vec<f32>, ProviderError> {
        Ok(self.output.clone())
    }
}
