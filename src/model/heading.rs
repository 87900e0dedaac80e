//! Heading candidates and document outlines.

use serde::{Deserialize, Serialize};

/// A layout-derived span hypothesized to be a section title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Heading text (trimmed)
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Font size in points
    pub font_size: f32,
    /// Whether the heading is set in bold
    pub is_bold: bool,
    /// Whether the heading is set in italic
    pub is_italic: bool,
    /// Vertical position on the page
    pub position_y: f32,
    /// Heading level (1-6, 1 = most prominent)
    pub level: u8,
}

impl HeadingCandidate {
    /// Markdown-style level tag ("H1".."H6").
    pub fn level_tag(&self) -> String {
        format!("H{}", self.level)
    }
}

/// A single entry in a document outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Level tag ("H1".."H6")
    pub level: String,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Document title plus its heading outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title
    pub title: String,
    /// Headings in document order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// Build an outline from detected headings.
    ///
    /// The title is the first level-1 heading, else the first heading, else
    /// the fallback.
    pub fn from_headings(headings: &[HeadingCandidate], fallback_title: &str) -> Self {
        Self {
            title: document_title(headings, fallback_title),
            outline: headings
                .iter()
                .map(|h| OutlineEntry {
                    level: h.level_tag(),
                    text: h.text.clone(),
                    page: h.page,
                })
                .collect(),
        }
    }
}

/// Pick a document title from its headings.
pub fn document_title(headings: &[HeadingCandidate], fallback: &str) -> String {
    headings
        .iter()
        .find(|h| h.level == 1)
        .or_else(|| headings.first())
        .map(|h| h.text.clone())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str, level: u8) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            page: 1,
            font_size: 12.0,
            is_bold: false,
            is_italic: false,
            position_y: 0.0,
            level,
        }
    }

    #[test]
    fn test_document_title_prefers_level_one() {
        let headings = vec![heading("Overview", 2), heading("Main Title", 1)];
        assert_eq!(document_title(&headings, "file.pdf"), "Main Title");
    }

    #[test]
    fn test_document_title_fallbacks() {
        let headings = vec![heading("Overview", 3)];
        assert_eq!(document_title(&headings, "file.pdf"), "Overview");
        assert_eq!(document_title(&[], "file.pdf"), "file.pdf");
    }

    #[test]
    fn test_outline_levels() {
        let outline = DocumentOutline::from_headings(&[heading("Intro", 2)], "x.pdf");
        assert_eq!(outline.outline[0].level, "H2");
        assert_eq!(outline.title, "Intro");
    }
}
