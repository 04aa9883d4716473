use thiserror::Error;

/// Failure of a [`super::CandidateSource`] fetch. Logged and skipped by the expansion
/// service; never returned from [`super::ContextExpansionService::expand`].
#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("fetch from {source_name} failed: {reason}")]
    FetchFailed { source_name: String, reason: String },

    #[error("candidate source unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type ExpansionResult<T> = Result<T, ExpansionError>;
