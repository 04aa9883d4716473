use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::candidate::Candidate;

use super::error::{ExpansionError, ExpansionResult};
use super::service::CandidateSource;
use super::types::{ExpansionScope, FetchRequest};

/// In-memory [`CandidateSource`] that serves canned chunks per (source, scope) and
/// records every request.
#[derive(Debug, Default)]
pub struct MockCandidateSource {
    chunks: HashMap<(String, ExpansionScope), Vec<Candidate>>,
    failing: HashSet<String>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockCandidateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `chunks` for fetches of `source` in `scope`.
    pub fn with_chunks(
        mut self,
        source: impl Into<String>,
        scope: ExpansionScope,
        chunks: Vec<Candidate>,
    ) -> Self {
        self.chunks.insert((source.into(), scope), chunks);
        self
    }

    /// Makes every fetch of `source` fail.
    pub fn with_failing_source(mut self, source: impl Into<String>) -> Self {
        self.failing.insert(source.into());
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CandidateSource for MockCandidateSource {
    async fn fetch_more(&self, request: FetchRequest) -> ExpansionResult<Vec<Candidate>> {
        self.requests.lock().push(request.clone());

        if self.failing.contains(&request.source) {
            return Err(ExpansionError::FetchFailed {
                source_name: request.source,
                reason: "mock source configured to fail".to_string(),
            });
        }

        Ok(self
            .chunks
            .get(&(request.source, request.scope))
            .map(|chunks| chunks.iter().take(request.count).cloned().collect())
            .unwrap_or_default())
    }
}
