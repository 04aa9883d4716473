use thiserror::Error;

use crate::config::ConfigError;
use crate::ensemble::EnsembleError;
use crate::query::PatternError;
use crate::thresholds::ThresholdError;

/// Errors raised while assembling a [`super::RetrievalPipeline`].
///
/// Processing a query never fails; every error surfaces at construction.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Patterns(#[from] PatternError),

    #[error(transparent)]
    Thresholds(#[from] ThresholdError),

    #[error(transparent)]
    Ensemble(#[from] EnsembleError),
}
