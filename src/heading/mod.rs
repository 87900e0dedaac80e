//! Heading detection from raw layout spans.
//!
//! Candidates are filtered by length, font size, the exclusion classifier
//! and punctuation density. The survivors are thresholded against the
//! document's font statistics and leveled by font-size tier.

mod exclusion;

pub use exclusion::ExclusionClassifier;

use std::collections::{BTreeSet, HashSet};

use crate::config::ExclusionPatterns;
use crate::error::Result;
use crate::model::{DocumentOutline, HeadingCandidate, RawSpan};
use crate::text::is_all_lower;

/// Smallest font size considered for a heading.
pub const MIN_HEADING_FONT: f32 = 10.0;
/// Largest font size considered for a heading.
pub const MAX_HEADING_FONT: f32 = 50.0;

const MIN_HEADING_CHARS: usize = 3;
const MAX_HEADING_CHARS: usize = 200;
const MAX_SPECIAL_CHAR_RATIO: f64 = 0.3;

/// Font statistics over a document's heading candidates.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Mean font size
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Distinct sizes as 0.1pt keys, largest first
    pub tiers: Vec<i32>,
}

impl FontStatistics {
    /// Compute statistics from observed font sizes.
    pub fn from_sizes(sizes: &[f32]) -> Self {
        if sizes.is_empty() {
            return Self::default();
        }

        let n = sizes.len() as f64;
        let mean = sizes.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = sizes
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        let distinct: BTreeSet<i32> = sizes.iter().map(|&s| size_key(s)).collect();
        let tiers = distinct.into_iter().rev().collect();

        Self {
            mean,
            std_dev: variance.sqrt(),
            tiers,
        }
    }

    /// Minimum font size for a non-bold heading.
    pub fn threshold(&self) -> f64 {
        self.mean + 0.5 * self.std_dev
    }

    /// Heading level for a font size (1 = largest tier, capped at 6).
    pub fn level_for(&self, font_size: f32, is_bold: bool) -> u8 {
        let key = size_key(font_size);
        let tier = self
            .tiers
            .iter()
            .position(|&t| t == key)
            .unwrap_or(self.tiers.len().saturating_sub(1));
        let level = (tier + 1).min(6) as u8;

        if is_bold {
            level.saturating_sub(1).max(1)
        } else {
            level
        }
    }
}

/// Round a font size to 0.1pt precision.
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Detects headings in a document's raw spans.
#[derive(Debug, Clone)]
pub struct HeadingDetector {
    exclusions: ExclusionClassifier,
}

impl HeadingDetector {
    /// Create a detector with the given exclusion classifier.
    pub fn new(exclusions: ExclusionClassifier) -> Self {
        Self { exclusions }
    }

    /// Create a detector from named exclusion patterns.
    pub fn from_patterns(patterns: &ExclusionPatterns) -> Result<Self> {
        Ok(Self::new(ExclusionClassifier::new(patterns)?))
    }

    /// Create a detector with the built-in exclusion patterns.
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(ExclusionClassifier::embedded()?))
    }

    /// The exclusion classifier in use.
    pub fn exclusions(&self) -> &ExclusionClassifier {
        &self.exclusions
    }

    /// Detect headings, ordered by (page, vertical position).
    ///
    /// Never fails: a document without spans has no headings.
    pub fn detect(&self, spans: &[RawSpan]) -> Vec<HeadingCandidate> {
        let mut seen = HashSet::new();
        let candidates: Vec<&RawSpan> = spans
            .iter()
            .filter(|span| self.is_candidate(span))
            .filter(|span| seen.insert(span.text.trim().to_lowercase()))
            .collect();

        if candidates.is_empty() {
            return Vec::new();
        }

        let sizes: Vec<f32> = candidates.iter().map(|s| s.font_size).collect();
        let stats = FontStatistics::from_sizes(&sizes);
        let threshold = stats.threshold();

        let retained: Vec<&RawSpan> = candidates
            .into_iter()
            .filter(|span| span.font_size as f64 >= threshold || span.is_bold)
            .filter(|span| span.is_bold || !reads_like_sentence(span.text.trim()))
            .collect();

        let retained_sizes: Vec<f32> = retained.iter().map(|s| s.font_size).collect();
        let tiers = FontStatistics::from_sizes(&retained_sizes);

        let mut headings: Vec<HeadingCandidate> = retained
            .into_iter()
            .map(|span| HeadingCandidate {
                text: span.text.trim().to_string(),
                page: span.page,
                font_size: span.font_size,
                is_bold: span.is_bold,
                is_italic: span.is_italic,
                position_y: span.y(),
                level: tiers.level_for(span.font_size, span.is_bold),
            })
            .collect();

        headings.sort_by(|a, b| {
            a.page.cmp(&b.page).then(
                a.position_y
                    .partial_cmp(&b.position_y)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        log::debug!(
            "Detected {} headings from {} spans (threshold {:.2}pt)",
            headings.len(),
            spans.len(),
            threshold
        );

        headings
    }

    /// Detect headings and build a title + outline.
    pub fn outline(&self, spans: &[RawSpan], fallback_title: &str) -> DocumentOutline {
        DocumentOutline::from_headings(&self.detect(spans), fallback_title)
    }

    fn is_candidate(&self, span: &RawSpan) -> bool {
        let text = span.text.trim();
        let len = text.chars().count();

        if !(MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&len) {
            return false;
        }
        if !(MIN_HEADING_FONT..=MAX_HEADING_FONT).contains(&span.font_size) {
            return false;
        }
        if self.exclusions.is_excluded(text) {
            return false;
        }

        special_char_ratio(text) <= MAX_SPECIAL_CHAR_RATIO
    }
}

/// Share of characters that are neither word characters nor whitespace.
fn special_char_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let special = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && *c != '_')
        .count();
    special as f64 / total as f64
}

/// Fully lowercase text, or more than two words that are mostly lowercase.
fn reads_like_sentence(text: &str) -> bool {
    if is_all_lower(text) {
        return true;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 2 {
        let lowercase = words.iter().filter(|w| is_all_lower(w)).count();
        return lowercase as f64 / words.len() as f64 > 0.6;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn span(text: &str, size: f32, page: u32, y: f32) -> RawSpan {
        RawSpan::new(text, size, page, BoundingBox::new(50.0, y, 300.0, y + size))
    }

    fn body(count: usize, size: f32) -> Vec<RawSpan> {
        (0..count)
            .map(|i| span(&format!("plain body words {}", i), size, 3, 100.0 + i as f32 * 20.0))
            .collect()
    }

    fn detector() -> HeadingDetector {
        HeadingDetector::embedded().unwrap()
    }

    #[test]
    fn test_empty_spans() {
        assert!(detector().detect(&[]).is_empty());
    }

    #[test]
    fn test_levels_monotonic_with_font_size() {
        let mut spans = vec![
            span("Main Title", 28.0, 1, 50.0),
            span("Chapter Overview", 20.0, 1, 120.0),
            span("Detailed Section", 18.0, 2, 80.0),
            span("Minor Point Here", 18.0, 2, 300.0),
        ];
        spans.extend(body(6, 10.0));
        let headings = detector().detect(&spans);
        assert_eq!(headings.len(), 4);

        for a in &headings {
            for b in &headings {
                if a.font_size > b.font_size && !a.is_bold && !b.is_bold {
                    assert!(a.level <= b.level, "{} vs {}", a.text, b.text);
                }
            }
        }
        let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 3]);
    }

    #[test]
    fn test_confidential_header_excluded() {
        let spans = vec![
            span("Confidential — Internal Use Only", 30.0, 1, 10.0),
            span("Service Agreement", 24.0, 1, 60.0),
        ];
        let headings = detector().detect(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Service Agreement");
    }

    #[test]
    fn test_equal_sizes_meet_threshold() {
        let documents = [
            vec![span("Southern Cuisine", 24.0, 1, 40.0)],
            vec![span("Coastal Adventures", 24.0, 1, 40.0)],
            vec![span("Nightlife Guide", 24.0, 1, 40.0)],
        ];
        for spans in &documents {
            let headings = detector().detect(spans);
            assert_eq!(headings.len(), 1);
            assert_eq!(headings[0].level, 1);
        }

        let all: Vec<RawSpan> = documents.concat();
        assert_eq!(detector().detect(&all).len(), 3);
    }

    #[test]
    fn test_bold_kept_and_promoted() {
        let spans = vec![
            span("Big Heading", 30.0, 1, 10.0),
            span("Small Regular", 12.0, 1, 60.0),
            span("Bold Label", 12.0, 1, 90.0).bold(),
        ];
        let headings = detector().detect(&spans);
        assert_eq!(headings.len(), 2);
        let bold = headings.iter().find(|h| h.text == "Bold Label").unwrap();
        assert_eq!(bold.level, 1);

        let stats = FontStatistics::from_sizes(&[30.0, 12.0]);
        assert_eq!(stats.level_for(12.0, false), 2);
        assert_eq!(stats.level_for(12.0, true), 1);
    }

    #[test]
    fn test_duplicates_and_sentences_dropped() {
        let spans = vec![
            span("Getting Started", 22.0, 1, 10.0),
            span("getting started", 22.0, 3, 10.0),
            span("Once upon a time there was a heading", 22.0, 2, 10.0),
        ];
        let headings = detector().detect(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].page, 1);
    }

    #[test]
    fn test_candidacy_filters() {
        let spans = vec![
            span("OK", 20.0, 1, 10.0),
            span("Tiny Font Heading", 8.0, 1, 20.0),
            span("Huge Font Heading", 60.0, 1, 30.0),
            span("$$$ !!! ###", 20.0, 1, 40.0),
            span("Real Heading", 20.0, 1, 50.0),
        ];
        let headings = detector().detect(&spans);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real Heading");
    }

    #[test]
    fn test_document_order() {
        let spans = vec![
            span("Later Page", 20.0, 2, 10.0),
            span("Lower On Page", 20.0, 1, 500.0),
            span("Top Of Page", 20.0, 1, 20.0),
        ];
        let headings = detector().detect(&spans);
        let texts: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Top Of Page", "Lower On Page", "Later Page"]);
    }

    #[test]
    fn test_outline() {
        let mut spans = vec![
            span("Travel Guide", 28.0, 1, 10.0),
            span("Things To Do", 20.0, 1, 100.0),
        ];
        spans.extend(body(4, 11.0));
        let outline = detector().outline(&spans, "guide.pdf");
        assert_eq!(outline.title, "Travel Guide");
        assert_eq!(outline.outline.len(), 2);
        assert_eq!(outline.outline[1].level, "H2");
    }

    #[test]
    fn test_font_statistics() {
        let stats = FontStatistics::from_sizes(&[24.0, 24.0, 24.0]);
        assert_eq!(stats.mean, 24.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.threshold(), 24.0);
        assert_eq!(stats.tiers, vec![240]);
    }
}
