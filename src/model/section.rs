//! Sections and their relevance scores.

use serde::{Deserialize, Serialize};

/// A heading plus the text that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source document file name
    pub filename: String,
    /// Heading text
    pub heading: String,
    /// Heading level (1-6)
    pub level: u8,
    /// Page number (1-indexed)
    pub page: u32,
    /// Body text following the heading
    pub text: String,
    /// Heading font size
    pub font_size: f32,
    /// Whether the heading is bold
    pub is_bold: bool,
}

impl Section {
    /// Create a section with default layout metadata.
    pub fn new(
        filename: impl Into<String>,
        heading: impl Into<String>,
        page: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            heading: heading.into(),
            level: 1,
            page,
            text: text.into(),
            font_size: 12.0,
            is_bold: false,
        }
    }

    /// Set the heading level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level.clamp(1, 6);
        self
    }

    /// Set heading font metrics.
    pub fn with_font(mut self, font_size: f32, is_bold: bool) -> Self {
        self.font_size = font_size;
        self.is_bold = is_bold;
        self
    }

    /// Whether the section has neither heading nor body text.
    pub fn is_empty(&self) -> bool {
        self.heading.trim().is_empty() && self.text.trim().is_empty()
    }
}

/// Sub-scores and the combined total for a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    /// Weighted keyword overlap of heading + body
    pub keyword: f64,
    /// Weighted keyword overlap of heading alone
    pub title: f64,
    /// Ordinal position prior
    pub position: f64,
    /// Word-count prior
    pub length: f64,
    /// Weighted combination in [0, 1]
    pub total: f64,
}

/// A section with its relevance scores and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    /// The scored section
    pub section: Section,
    /// Relevance scores
    pub scores: SectionScores,
    /// Rank after sorting (1 = best, 0 = unranked)
    pub importance_rank: u32,
}

impl ScoredSection {
    /// Attach scores to a section (unranked).
    pub fn new(section: Section, scores: SectionScores) -> Self {
        Self {
            section,
            scores,
            importance_rank: 0,
        }
    }

    /// Copy with an importance rank assigned.
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.importance_rank = rank;
        self
    }

    /// Source document file name.
    pub fn filename(&self) -> &str {
        &self.section.filename
    }

    /// Total relevance score.
    pub fn total(&self) -> f64 {
        self.scores.total
    }
}
