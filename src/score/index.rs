//! Normalized token index for keyword lookups.

use std::collections::HashSet;

use super::MatchMode;
use crate::text::word_tokens;

/// Function words ignored when indexing section text.
const SCORER_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

const MIN_TOKEN_CHARS: usize = 3;

/// Distinct normalized tokens of a text.
///
/// Exact hits are a hash lookup; containment scans the distinct tokens
/// once per keyword instead of every token occurrence.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    tokens: HashSet<String>,
}

impl TokenIndex {
    /// Index a text.
    pub fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let tokens = word_tokens(&lower, MIN_TOKEN_CHARS)
            .filter(|t| !SCORER_STOP_WORDS.contains(t))
            .filter(|t| !t.chars().all(char::is_numeric))
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    /// Whether the text had no indexable tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether a token is present verbatim.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Whether a keyword matches any token under the given mode.
    pub fn matches(&self, keyword: &str, mode: MatchMode) -> bool {
        let keyword = keyword.to_lowercase();
        if self.tokens.contains(&keyword) {
            return true;
        }
        match mode {
            MatchMode::Exact => false,
            MatchMode::Containment => self
                .tokens
                .iter()
                .any(|t| t.contains(keyword.as_str()) || keyword.contains(t.as_str())),
        }
    }
}
