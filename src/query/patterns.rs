//! Versioned classification data for the query analyzer.
//!
//! The table is plain data so deployments can tune classification without code changes:
//! serialize [`PatternTable::default`] to JSON, edit it, and load it back with
//! [`PatternTable::from_path`]. Type patterns are tried in list order; the first match wins.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::PatternError;
use super::types::QueryType;

pub const PATTERN_TABLE_VERSION: u32 = 1;

/// Ordered regex list for one query type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePatterns {
    pub query_type: QueryType,
    pub patterns: Vec<String>,
}

/// Language-specific classification tables.
///
/// Word lists are matched against lowercased, punctuation-trimmed tokens. Entries that
/// contain a space are matched as substrings of the lowercased query instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTable {
    pub version: u32,
    /// Queries with at most this many counted words are `SHORT`.
    pub short_query_max_words: usize,
    /// Queries with more than this many counted words are `COMPLEX`.
    pub complex_query_min_words: usize,
    /// Type patterns in priority order.
    pub patterns: Vec<TypePatterns>,
    /// Regexes signalling amounts, dates or prices.
    pub factual_indicators: Vec<String>,
    pub technical_terms: Vec<String>,
    pub domain_terms: Vec<String>,
    pub conditional_words: Vec<String>,
    pub compound_words: Vec<String>,
    pub stopwords: Vec<String>,
    /// Copulas and articles that do not count towards `word_count`.
    pub filler_words: Vec<String>,
    /// Marker tokens of the primary language (German).
    pub primary_markers: Vec<String>,
    /// Characters that only occur in the primary language.
    pub primary_diacritics: String,
    /// Marker tokens of the secondary language (English).
    pub secondary_markers: Vec<String>,
}

impl PatternTable {
    pub fn from_json_str(json: &str) -> Result<Self, PatternError> {
        let table: PatternTable = serde_json::from_str(json)?;
        table.check_version()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, PatternError> {
        let json = std::fs::read_to_string(path).map_err(|source| PatternError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, PatternError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_version(&self) -> Result<(), PatternError> {
        if self.version != PATTERN_TABLE_VERSION {
            return Err(PatternError::UnsupportedVersion {
                version: self.version,
                expected: PATTERN_TABLE_VERSION,
            });
        }
        Ok(())
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

fn type_patterns(query_type: QueryType, patterns: &[&str]) -> TypePatterns {
    TypePatterns {
        query_type,
        patterns: words(patterns),
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            version: PATTERN_TABLE_VERSION,
            short_query_max_words: 2,
            complex_query_min_words: 10,
            patterns: vec![
                type_patterns(
                    QueryType::Comparison,
                    &[
                        r"\b(unterschied\w*|vergleich\w*|versus|difference\w*|compar\w*)\b",
                        r"\bvs\b",
                    ],
                ),
                type_patterns(
                    QueryType::Definition,
                    &[
                        r"\b(definition|definiere|bedeutet|bedeutung|define|meaning)\b",
                        r"\bwas versteht man unter\b",
                    ],
                ),
                type_patterns(
                    QueryType::Procedure,
                    &[
                        r"\b(schritt\w*|anleitung|einrichten|erstellen|installieren|konfigurieren)\b",
                        r"\b(steps?|guide|tutorial|setup|install|configure)\b",
                        r"\bset up\b",
                    ],
                ),
                type_patterns(
                    QueryType::WhatIs,
                    &[r"^(was ist|was sind|what is|what are|what's)\b"],
                ),
                type_patterns(
                    QueryType::HowDoes,
                    &[
                        r"^(wie funktioniert|wie funktionieren|wie geht|wie kann|wie wird|wie werden)\b",
                        r"^(how does|how do|how can|how is|how are)\b",
                    ],
                ),
                type_patterns(
                    QueryType::WhereIs,
                    &[r"^(wo ist|wo sind|wo finde|wo kann|where is|where are|where can|where do)\b"],
                ),
                type_patterns(QueryType::Why, &[r"^(warum|wieso|weshalb|why)\b"]),
                type_patterns(
                    QueryType::WhoIs,
                    &[r"^(wer ist|wer sind|wer kann|who is|who are|who can)\b"],
                ),
            ],
            factual_indicators: words(&[
                r"\d",
                r"[€$£%]",
                r"\b(preis\w*|kosten|kostet|betrag|datum|wann|anzahl|wie viele?|wie lange)\b",
                r"\b(price\w*|costs?|amount|date|when|how much|how many|how long)\b",
            ]),
            technical_terms: words(&[
                "api", "server", "datenbank", "database", "konfiguration", "configuration",
                "parameter", "schnittstelle", "interface", "protokoll", "protocol", "skript",
                "script", "cluster", "deployment", "cron", "xml", "json", "sql", "http", "ssl",
                "port", "logfile", "variable",
            ]),
            domain_terms: words(&[
                "streamworks", "job", "jobs", "stream", "streams", "scheduler", "workflow",
                "agent", "batch", "zeitplan", "schedule", "queue", "monitoring", "ausführung",
                "execution", "abhängigkeit", "dependency", "kalender", "calendar",
            ]),
            conditional_words: words(&[
                "wenn", "falls", "sofern", "ob", "if", "unless", "whether",
            ]),
            compound_words: words(&[
                "und", "oder", "aber", "sowie", "sondern", "während", "and", "or", "but",
                "while", "whereas",
            ]),
            stopwords: words(&[
                "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "einem",
                "einer", "und", "oder", "aber", "ist", "sind", "war", "wird", "werden", "kann",
                "können", "mit", "für", "auf", "von", "zu", "im", "in", "an", "bei", "aus",
                "nach", "wie", "was", "wo", "wer", "warum", "ich", "du", "es", "sie", "wir",
                "nicht", "auch", "noch", "man", "sich", "the", "a", "an", "and", "or", "but",
                "is", "are", "was", "were", "be", "been", "to", "of", "for", "on", "with", "at",
                "by", "from", "as", "it", "its", "this", "that", "what", "how", "where", "why",
                "who", "which", "can", "do", "does", "i", "you", "we", "they", "not",
            ]),
            filler_words: words(&[
                "ist", "sind", "is", "are", "der", "die", "das", "the", "a", "an", "ein",
                "eine", "einen",
            ]),
            primary_markers: words(&[
                "der", "die", "das", "den", "dem", "des", "und", "ist", "sind", "nicht", "wie",
                "was", "wo", "warum", "wer", "ich", "mit", "für", "auf", "ein", "eine", "einen",
                "zu", "von", "wird", "werden", "kann", "können", "bei", "im", "zwischen",
                "welche", "gibt", "es",
            ]),
            primary_diacritics: "äöüß".to_string(),
            secondary_markers: words(&[
                "the", "and", "is", "are", "not", "how", "what", "where", "why", "who", "with",
                "for", "on", "a", "an", "to", "of", "can", "does", "do", "will", "which",
                "between", "there",
            ]),
        }
    }
}
