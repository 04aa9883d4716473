//! Context expansion for thin retrieval results.
//!
//! When the mean similarity of the selected candidates falls below the query's
//! `context_expansion_trigger`, more chunks are requested from an injected
//! [`CandidateSource`] and merged in.

pub mod error;
pub mod service;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::{ExpansionError, ExpansionResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCandidateSource;
pub use service::{CandidateSource, ContextExpansionService, merge_candidates};
pub use types::{ExpansionOutcome, ExpansionScope, ExpansionStrategy, FetchRequest};
