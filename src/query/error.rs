use std::path::PathBuf;
use thiserror::Error;

use super::types::QueryType;

/// Errors raised while loading or compiling a [`super::PatternTable`].
///
/// Analysis itself never fails; all validation happens at load time.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to read pattern table at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pattern table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pattern for {query_type}: '{pattern}': {source}")]
    InvalidRegex {
        query_type: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{query_type} is assigned structurally and cannot carry patterns")]
    ReservedType { query_type: QueryType },

    #[error("{query_type} appears more than once in the pattern table")]
    DuplicateType { query_type: QueryType },

    #[error("unsupported pattern table version {version} (expected {expected})")]
    UnsupportedVersion { version: u32, expected: u32 },
}
