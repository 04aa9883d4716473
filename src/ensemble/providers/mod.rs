//! Built-in scoring providers.

pub mod embedding;
pub mod http;
pub mod lexical;

pub use embedding::EmbeddingSimilarityProvider;
pub use http::HttpRerankProvider;
pub use lexical::LexicalProvider;
