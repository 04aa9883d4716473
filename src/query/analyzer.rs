use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::error::PatternError;
use super::patterns::{PATTERN_TABLE_VERSION, PatternTable};
use super::types::{Query, QueryType};

const WORD_COUNT_CAP: usize = 20;
const WORD_COUNT_WEIGHT: f32 = 0.4;
const TECHNICAL_WEIGHT: f32 = 0.25;
const CONDITIONAL_WEIGHT: f32 = 0.2;
const COMPOUND_WEIGHT: f32 = 0.15;
const DOMAIN_TERM_BONUS: f32 = 0.1;
const MIN_CONTENT_TOKEN_CHARS: usize = 2;

/// Word list split into single tokens (set lookup) and multi-word phrases (substring lookup).
#[derive(Debug, Clone, Default)]
struct TermSet {
    tokens: HashSet<String>,
    phrases: Vec<String>,
}

impl TermSet {
    fn new(words: &[String]) -> Self {
        let mut set = Self::default();
        for word in words {
            let word = word.trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if word.contains(' ') {
                set.phrases.push(word);
            } else {
                set.tokens.insert(word);
            }
        }
        set
    }

    #[inline]
    fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    fn hits(&self, tokens: &[String], lowered: &str) -> usize {
        let token_hits = tokens.iter().filter(|t| self.tokens.contains(*t)).count();
        let phrase_hits = self.phrases.iter().filter(|p| lowered.contains(*p)).count();
        token_hits + phrase_hits
    }
}

/// Deterministic query classifier.
///
/// All regexes are compiled once from a [`PatternTable`]; [`QueryAnalyzer::analyze`] is a pure
/// function of its input and never fails.
#[derive(Debug, Clone)]
pub struct QueryAnalyzer {
    version: u32,
    short_max_words: usize,
    complex_min_words: usize,
    type_patterns: Vec<(QueryType, Vec<Regex>)>,
    factual_indicators: Vec<Regex>,
    technical_terms: TermSet,
    domain_terms: TermSet,
    conditional_words: TermSet,
    compound_words: TermSet,
    stopwords: TermSet,
    filler_words: TermSet,
    primary_markers: TermSet,
    primary_diacritics: Vec<char>,
    secondary_markers: TermSet,
}

impl QueryAnalyzer {
    /// Creates an analyzer with the built-in German/English table.
    pub fn new() -> Self {
        Self::from_table(&PatternTable::default()).expect("built-in pattern table compiles")
    }

    /// Compiles a pattern table. Invalid regexes and reserved types are rejected here.
    pub fn from_table(table: &PatternTable) -> Result<Self, PatternError> {
        if table.version != PATTERN_TABLE_VERSION {
            return Err(PatternError::UnsupportedVersion {
                version: table.version,
                expected: PATTERN_TABLE_VERSION,
            });
        }

        let mut seen = HashSet::new();
        let mut type_patterns = Vec::with_capacity(table.patterns.len());
        for entry in &table.patterns {
            if entry.query_type.is_structural() {
                return Err(PatternError::ReservedType {
                    query_type: entry.query_type,
                });
            }
            if !seen.insert(entry.query_type) {
                return Err(PatternError::DuplicateType {
                    query_type: entry.query_type,
                });
            }
            let compiled = entry
                .patterns
                .iter()
                .map(|p| compile(entry.query_type.as_str(), p))
                .collect::<Result<Vec<_>, _>>()?;
            type_patterns.push((entry.query_type, compiled));
        }

        let factual_indicators = table
            .factual_indicators
            .iter()
            .map(|p| compile(QueryType::Factual.as_str(), p))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            version = table.version,
            types = type_patterns.len(),
            factual_indicators = factual_indicators.len(),
            "Compiled query pattern table"
        );

        Ok(Self {
            version: table.version,
            short_max_words: table.short_query_max_words,
            complex_min_words: table.complex_query_min_words,
            type_patterns,
            factual_indicators,
            technical_terms: TermSet::new(&table.technical_terms),
            domain_terms: TermSet::new(&table.domain_terms),
            conditional_words: TermSet::new(&table.conditional_words),
            compound_words: TermSet::new(&table.compound_words),
            stopwords: TermSet::new(&table.stopwords),
            filler_words: TermSet::new(&table.filler_words),
            primary_markers: TermSet::new(&table.primary_markers),
            primary_diacritics: table.primary_diacritics.to_lowercase().chars().collect(),
            secondary_markers: TermSet::new(&table.secondary_markers),
        })
    }

    /// Loads and compiles a JSON pattern table from disk.
    pub fn from_path(path: &Path) -> Result<Self, PatternError> {
        Self::from_table(&PatternTable::from_path(path)?)
    }

    pub fn table_version(&self) -> u32 {
        self.version
    }

    /// Classifies a raw query and computes its feature scores.
    pub fn analyze(&self, query: &str) -> Query {
        let lowered = query.trim().to_lowercase();
        let tokens = tokenize(&lowered);

        if tokens.is_empty() {
            debug!("Empty query, using neutral classification");
            return Query::neutral(query);
        }

        let word_count = tokens
            .iter()
            .filter(|t| !self.filler_words.contains(t))
            .count();

        let query_type = self.classify(&lowered, word_count);
        let complexity_score = self.complexity(&tokens, &lowered, word_count);
        let semantic_density = self.density(&tokens, &lowered, word_count);
        let language_confidence = self.language(&tokens, &lowered);

        debug!(
            query_type = %query_type,
            word_count,
            complexity_score,
            semantic_density,
            language_confidence,
            "Analyzed query"
        );

        Query::new(
            query,
            query_type,
            word_count,
            complexity_score,
            semantic_density,
            language_confidence,
        )
    }

    fn classify(&self, lowered: &str, word_count: usize) -> QueryType {
        if word_count <= self.short_max_words {
            return QueryType::Short;
        }
        if word_count > self.complex_min_words {
            return QueryType::Complex;
        }

        for (query_type, patterns) in &self.type_patterns {
            if patterns.iter().any(|re| re.is_match(lowered)) {
                return *query_type;
            }
        }

        if self.factual_indicators.iter().any(|re| re.is_match(lowered)) {
            return QueryType::Factual;
        }

        QueryType::General
    }

    fn complexity(&self, tokens: &[String], lowered: &str, word_count: usize) -> f32 {
        let length_term =
            word_count.min(WORD_COUNT_CAP) as f32 / WORD_COUNT_CAP as f32 * WORD_COUNT_WEIGHT;

        let technical = self.technical_terms.hits(tokens, lowered) > 0
            || self.domain_terms.hits(tokens, lowered) > 0;
        let conditional = self.conditional_words.hits(tokens, lowered) > 0;
        let compound = self.compound_words.hits(tokens, lowered) > 0;

        let mut score = length_term;
        if technical {
            score += TECHNICAL_WEIGHT;
        }
        if conditional {
            score += CONDITIONAL_WEIGHT;
        }
        if compound {
            score += COMPOUND_WEIGHT;
        }
        score.clamp(0.0, 1.0)
    }

    fn density(&self, tokens: &[String], lowered: &str, word_count: usize) -> f32 {
        if word_count == 0 {
            return 0.0;
        }
        let content_tokens = tokens
            .iter()
            .filter(|t| {
                t.chars().count() > MIN_CONTENT_TOKEN_CHARS
                    && !self.stopwords.contains(t)
                    && !self.filler_words.contains(t)
            })
            .count();
        let domain_hits = self.domain_terms.hits(tokens, lowered);

        let density = content_tokens as f32 / word_count as f32 + DOMAIN_TERM_BONUS * domain_hits as f32;
        density.clamp(0.0, 1.0)
    }

    fn language(&self, tokens: &[String], lowered: &str) -> f32 {
        let diacritics = lowered
            .chars()
            .filter(|c| self.primary_diacritics.contains(c))
            .count();
        let primary = self.primary_markers.hits(tokens, lowered) + diacritics;
        let secondary = self.secondary_markers.hits(tokens, lowered);

        if primary == secondary {
            return 0.5;
        }
        primary as f32 / (primary + secondary) as f32
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(query_type: &str, pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError::InvalidRegex {
            query_type: query_type.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

/// Splits on whitespace and trims punctuation from token edges.
fn tokenize(lowered: &str) -> Vec<String> {
    lowered
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
