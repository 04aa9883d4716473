use std::time::Duration;

use thiserror::Error;

/// Why a provider's scores were excluded from a scoring round.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("provider {provider} returned {actual} scores for {expected} candidates")]
    LengthMismatch {
        provider: String,
        expected: usize,
        actual: usize,
    },

    #[error("provider {provider} returned a non-finite score at index {index}")]
    NonFinite { provider: String, index: usize },

    #[error("provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("provider {provider} failed: {reason}")]
    Failed { provider: String, reason: String },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Timeout { provider, .. }
            | ProviderError::LengthMismatch { provider, .. }
            | ProviderError::NonFinite { provider, .. }
            | ProviderError::RequestFailed { provider, .. }
            | ProviderError::Failed { provider, .. } => provider,
        }
    }
}

/// Invalid ensemble configuration.
#[derive(Debug, Error)]
pub enum EnsembleError {
    #[error("invalid ensemble configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("duplicate provider name: {name}")]
    DuplicateProvider { name: String },
}
