//! Excerpt refinement: normalization, artifact removal and sentence-aware
//! truncation.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::text::{collapse_whitespace, is_terminal, split_sentences};

/// Cleans a chunk into a self-contained excerpt.
#[derive(Debug, Clone)]
pub struct TextRefiner {
    max_len: usize,
    page_number_line: Regex,
    page_label: Regex,
    page_fraction: Regex,
    hyphenation: Regex,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl TextRefiner {
    /// Create a refiner that truncates at `max_len` characters.
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            page_number_line: Regex::new(r"(?m)^[\s]*[-–—]?\s*\d+\s*[-–—]?\s*$").unwrap(),
            page_label: Regex::new(r"(?i)\bpage\s+\d+(\s+of\s+\d+)?\b").unwrap(),
            page_fraction: Regex::new(r"\b\d+\s+/\s+\d+\b").unwrap(),
            hyphenation: Regex::new(r"([a-zA-Z])-\s*\n\s*([a-z])").unwrap(),
            ligature_map: vec![
                ("\u{FB00}", "ff"),
                ("\u{FB01}", "fi"),
                ("\u{FB02}", "fl"),
                ("\u{FB03}", "ffi"),
                ("\u{FB04}", "ffl"),
            ],
        }
    }

    /// Maximum excerpt length in characters.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Refine text into complete sentences no longer than the maximum.
    pub fn refine(&self, text: &str) -> String {
        let mut result: String = text.nfc().collect();

        for (ligature, replacement) in &self.ligature_map {
            result = result.replace(ligature, replacement);
        }
        result = result.replace('\u{FFFD}', "");

        // Line-level artifacts must go before whitespace is collapsed
        result = self.page_number_line.replace_all(&result, "").to_string();
        result = self.hyphenation.replace_all(&result, "$1$2").to_string();

        result = self.page_label.replace_all(&result, "").to_string();
        result = self.page_fraction.replace_all(&result, "").to_string();
        result = collapse_whitespace(&result);

        if result.is_empty() {
            return result;
        }

        result = complete_sentences(result);

        if result.chars().count() > self.max_len {
            result = self.truncate(&result);
        }
        result
    }

    /// Keep whole sentences up to the maximum length.
    fn truncate(&self, text: &str) -> String {
        let mut kept = String::new();
        for sentence in split_sentences(text) {
            let extra = sentence.chars().count() + usize::from(!kept.is_empty());
            if kept.chars().count() + extra > self.max_len {
                break;
            }
            if !kept.is_empty() {
                kept.push(' ');
            }
            kept.push_str(sentence);
        }

        if kept.is_empty() {
            // A single sentence longer than the limit: cut at a word boundary
            let limit: String = text.chars().take(self.max_len.saturating_sub(1)).collect();
            let cut = limit.rfind(char::is_whitespace).unwrap_or(limit.len());
            kept = limit[..cut].trim_end().to_string();
            kept.push('.');
        }
        kept
    }
}

impl Default for TextRefiner {
    fn default() -> Self {
        Self::new(600)
    }
}

/// Drop a trailing sentence fragment, or close the text if it has none.
fn complete_sentences(mut text: String) -> String {
    if text.ends_with(is_terminal) || text.ends_with(':') {
        return text;
    }
    match text.rfind(is_terminal) {
        Some(i) => text.truncate(i + 1),
        None => text.push('.'),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_normalization() {
        let refiner = TextRefiner::default();
        let result = refiner.refine("Cafe\u{0301} culture.");
        assert_eq!(result, "Caf\u{00E9} culture.");
    }

    #[test]
    fn test_strips_page_artifacts() {
        let refiner = TextRefiner::default();
        let text = "The coast is lovely.\n12\nPage 3 of 10 Markets open early. 4 / 12";
        let result = refiner.refine(text);
        assert_eq!(result, "The coast is lovely. Markets open early.");
    }

    #[test]
    fn test_trailing_fragment_dropped() {
        let refiner = TextRefiner::default();
        assert_eq!(
            refiner.refine("First sentence. Second sentence. And then the"),
            "First sentence. Second sentence."
        );
        assert_eq!(refiner.refine("no terminal at all"), "no terminal at all.");
    }

    #[test]
    fn test_truncates_at_sentence_boundary() {
        let refiner = TextRefiner::new(60);
        let text = "One short sentence here. Another short sentence here. A third one that overflows.";
        let result = refiner.refine(text);
        assert_eq!(result, "One short sentence here. Another short sentence here.");
        assert!(result.chars().count() <= 60);
    }

    #[test]
    fn test_single_long_sentence_cut_at_word() {
        let refiner = TextRefiner::new(20);
        let result = refiner.refine("This sentence is definitely longer than twenty characters.");
        assert!(result.chars().count() <= 20);
        assert!(result.ends_with('.'));
        assert_eq!(result, "This sentence is.");
    }

    #[test]
    fn test_hyphenation_and_ligatures() {
        let refiner = TextRefiner::default();
        assert_eq!(
            refiner.refine("The \u{FB01}shing infor-\nmation."),
            "The fishing information."
        );
    }
}
