//! Query analysis: classification into a [`QueryType`] plus complexity, semantic-density
//! and language-confidence features.
//!
//! Classification rules, in order:
//! 1. empty input → neutral `GENERAL`
//! 2. `word_count <= short_query_max_words` → `SHORT`
//! 3. `word_count > complex_query_min_words` → `COMPLEX`
//! 4. first matching type pattern (table order)
//! 5. factual indicators (amounts, dates, prices) → `FACTUAL`
//! 6. otherwise `GENERAL`

pub mod analyzer;
pub mod error;
pub mod patterns;
pub mod types;


pub use analyzer::QueryAnalyzer;
pub use error::PatternError;
pub use patterns::{PATTERN_TABLE_VERSION, PatternTable, TypePatterns};
pub use types::{Query, QueryType};
