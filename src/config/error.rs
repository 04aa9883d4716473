//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;
use crate::ensemble::EnsembleError;
use crate::thresholds::ThresholdError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value could not be parsed as a floating-point number.
    #[error("failed to parse {name}='{value}' as a number: {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Value could not be parsed as an unsigned integer.
    #[error("failed to parse {name}='{value}' as an integer: {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Base thresholds are out of range or inverted.
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Ensemble(#[from] EnsembleError),

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file.
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
