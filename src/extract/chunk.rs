//! Splitting section text into candidate chunks and scoring them.

use regex::Regex;

use crate::config::ExtractOptions;
use crate::profile::ProfileAnalysis;
use crate::text::{collapse_whitespace, is_terminal, split_sentences};

/// Occurrences of a keyword counted toward a chunk score.
const MAX_KEYWORD_OCCURRENCES: usize = 3;

/// Splits section text into content-rich chunks.
#[derive(Debug, Clone)]
pub struct Chunker {
    min_len: usize,
    min_extendable_len: usize,
    context_chars: usize,
}

impl Chunker {
    /// Create a chunker from extract options.
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            min_len: options.min_chunk_len,
            min_extendable_len: options.min_extendable_len,
            context_chars: options.context_chars,
        }
    }

    /// Split text into chunks.
    ///
    /// Paragraphs are separated by blank lines. Long paragraphs are chunks
    /// as they are, medium ones are widened with surrounding sentences. When
    /// no paragraph qualifies, sentences are packed greedily instead.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let paragraphs = paragraphs(text);
        if paragraphs.is_empty() {
            return Vec::new();
        }
        let full = paragraphs.join(" ");

        let mut chunks = Vec::new();
        for paragraph in &paragraphs {
            let len = paragraph.chars().count();
            if len >= self.min_len {
                chunks.push(paragraph.clone());
            } else if len >= self.min_extendable_len {
                let extended = self.extend_with_context(paragraph, &full);
                if extended.chars().count() >= self.min_len {
                    chunks.push(extended);
                }
            }
        }

        if chunks.is_empty() {
            chunks = self.sentence_chunks(&full);
        }
        chunks
    }

    /// Widen a short paragraph with context trimmed to sentence boundaries.
    fn extend_with_context(&self, chunk: &str, full: &str) -> String {
        let Some(pos) = full.find(chunk) else {
            return chunk.to_string();
        };
        let chunk_end = pos + chunk.len();
        let before = byte_span(full, pos, self.context_chars, true);
        let after = byte_span(full, chunk_end, self.context_chars, false);
        let start = floor_boundary(full, pos.saturating_sub(before));
        let end = ceil_boundary(full, chunk_end + after);

        // Drop a partial sentence at the front of the window
        let mut from = start;
        if start > 0 {
            if let Some(cut) = sentence_cut(&full[start..pos]) {
                from = start + cut;
            } else {
                from = pos;
            }
        }

        // Drop a partial sentence at the back of the window
        let mut to = end;
        if end < full.len() {
            to = match full[chunk_end..end].rfind(is_terminal) {
                Some(i) => chunk_end + i + 1,
                None => chunk_end,
            };
        }

        full[from..to].trim().to_string()
    }

    /// Pack sentences until each chunk reaches the minimum length.
    fn sentence_chunks(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in split_sentences(text) {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
            if current.chars().count() >= self.min_len {
                chunks.push(terminate(std::mem::take(&mut current)));
            }
        }

        if current.chars().count() >= self.min_extendable_len {
            chunks.push(terminate(current));
        }
        chunks
    }
}

/// Blank-line separated paragraphs with inner whitespace collapsed.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(collapse_whitespace(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(collapse_whitespace(&current.join(" ")));
    }
    paragraphs
}

/// Byte length of `chars` characters before or after `at`.
fn byte_span(text: &str, at: usize, chars: usize, backwards: bool) -> usize {
    if backwards {
        text[..at].chars().rev().take(chars).map(char::len_utf8).sum()
    } else {
        text[at..].chars().take(chars).map(char::len_utf8).sum()
    }
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Offset just past the first sentence end (terminal + whitespace).
fn sentence_cut(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if is_terminal(c) {
            if let Some(&(j, next)) = chars.peek() {
                if next.is_whitespace() {
                    return Some(j);
                }
            } else {
                return Some(i + c.len_utf8());
            }
        }
    }
    None
}

fn terminate(mut text: String) -> String {
    if !text.ends_with(is_terminal) {
        text.push('.');
    }
    text
}

/// Scores chunks by keyword density and content quality.
#[derive(Debug, Clone)]
pub struct ChunkScorer {
    action_verbs: Vec<String>,
    number: Regex,
    proper_noun_pair: Regex,
    colon_capital: Regex,
    dash_capital: Regex,
    action_verb: Regex,
}

impl ChunkScorer {
    /// Create a scorer from extract options.
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            action_verbs: options.action_verbs.iter().map(|v| v.to_lowercase()).collect(),
            number: Regex::new(r"\b\d+\b").unwrap(),
            proper_noun_pair: Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b").unwrap(),
            colon_capital: Regex::new(r":\s*[A-Z]").unwrap(),
            dash_capital: Regex::new(r"-\s*[A-Z]").unwrap(),
            action_verb: Regex::new(
                r"(?i)\b(visit|try|explore|enjoy|experience|discover|take|go|see)\b",
            )
            .unwrap(),
        }
    }

    /// Keyword score plus quality bonuses.
    pub fn score(&self, text: &str, profile: &ProfileAnalysis) -> f64 {
        if text.is_empty() || profile.all_keywords.is_empty() {
            return 0.0;
        }
        let lower = text.to_lowercase();

        let mut total_weight = 0.0;
        let mut matched_weight = 0.0;
        for keyword in &profile.all_keywords {
            let weight = profile.weight(keyword);
            total_weight += weight;
            let count = lower.matches(keyword.as_str()).count();
            matched_weight += weight * count.min(MAX_KEYWORD_OCCURRENCES) as f64;
        }
        let keyword_score = if total_weight > 0.0 {
            matched_weight / total_weight
        } else {
            0.0
        };

        keyword_score + self.quality_bonus(text, &lower)
    }

    fn quality_bonus(&self, text: &str, lower: &str) -> f64 {
        let mut bonus = 0.0;

        if self.number.is_match(text) {
            bonus += 0.1;
        }

        let verbs = self
            .action_verbs
            .iter()
            .filter(|v| lower.contains(v.as_str()))
            .count();
        bonus += 0.05 * verbs as f64;

        if text.contains(':') || text.contains('-') {
            bonus += 0.1;
        }

        let len = text.chars().count();
        if (150..=500).contains(&len) {
            bonus += 0.2;
        } else if (100..=600).contains(&len) {
            bonus += 0.1;
        }

        bonus
    }

    /// Whether the text carries at least two kinds of concrete detail.
    pub fn has_specifics(&self, text: &str) -> bool {
        [
            &self.number,
            &self.proper_noun_pair,
            &self.colon_capital,
            &self.dash_capital,
            &self.action_verb,
        ]
        .iter()
        .filter(|re| re.is_match(text))
        .count()
            >= 2
    }
}
