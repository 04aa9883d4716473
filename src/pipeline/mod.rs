//! Wires the analyzer, threshold manager, expansion service and ensemble reranker into a
//! single retrieval pass.

pub mod error;
pub mod retrieval;
pub mod types;


pub use error::PipelineError;
pub use retrieval::RetrievalPipeline;
pub use types::{RetrievalMetadata, RetrievalResponse};
