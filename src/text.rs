//! Small text predicates shared across stages.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").unwrap())
}

/// Runs of word characters with at least `min_chars` characters.
pub fn word_tokens(text: &str, min_chars: usize) -> impl Iterator<Item = &str> {
    word_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(move |w| w.chars().count() >= min_chars)
}

/// True if the text has cased letters and none of them is lowercase.
pub fn is_all_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// True if the text has cased letters and none of them is uppercase.
pub fn is_all_lower(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            cased = true;
        }
    }
    cased
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word-level Jaccard similarity of two texts (case-insensitive).
pub fn word_jaccard(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.split_whitespace().map(|w| w.to_lowercase()).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(|w| w.to_lowercase()).collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// Split text into sentences, keeping terminal punctuation.
///
/// A sentence ends at a run of `.`, `!` or `?` followed by whitespace or the
/// end of input.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if is_terminal(next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().map(|&(_, n)| n.is_whitespace()).unwrap_or(true);
        if at_boundary {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Sentence-terminating punctuation.
pub fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Quick check whether a line of page text reads like a heading: at most
/// eight words, at least 60 % of them capitalized.
pub fn looks_like_heading(line: &str) -> bool {
    let line = line.trim();
    if line.chars().count() < 3 {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 8 {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().map(char::is_uppercase).unwrap_or(false))
        .count();
    capitalized as f64 / words.len() as f64 >= 0.6
}
