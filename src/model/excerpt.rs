//! Refined excerpts selected from section text.

use serde::{Deserialize, Serialize};

/// A refined, bounded-length chunk of section text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    /// Source document file name
    pub document: String,
    /// Refined text
    pub refined_text: String,
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Combined selection score (provenance only, not part of the output)
    #[serde(skip)]
    pub score: f64,
}

impl Excerpt {
    /// Create a new excerpt.
    pub fn new(
        document: impl Into<String>,
        refined_text: impl Into<String>,
        page_number: u32,
        score: f64,
    ) -> Self {
        Self {
            document: document.into(),
            refined_text: refined_text.into(),
            page_number,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_not_serialized() {
        let excerpt = Excerpt::new("a.pdf", "Some text.", 3, 0.8);
        let json = serde_json::to_string(&excerpt).unwrap();
        assert!(json.contains("\"refined_text\""));
        assert!(json.contains("\"page_number\":3"));
        assert!(!json.contains("score"));
    }
}
