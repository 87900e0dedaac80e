//! Per-document load results.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::heading::{document_title, DocumentOutline, HeadingCandidate};

/// A loaded document: its text, detected headings and any load error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// File name
    pub filename: String,
    /// Full path
    #[serde(skip)]
    pub path: PathBuf,
    /// Document title
    pub title: String,
    /// Detected headings in document order
    pub headings: Vec<HeadingCandidate>,
    /// Page number to plain text
    pub page_texts: BTreeMap<u32, String>,
    /// Load failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentRecord {
    /// Record a successfully loaded document.
    pub fn loaded(
        filename: impl Into<String>,
        path: impl Into<PathBuf>,
        headings: Vec<HeadingCandidate>,
        page_texts: BTreeMap<u32, String>,
    ) -> Self {
        let filename = filename.into();
        Self {
            title: document_title(&headings, &filename),
            filename,
            path: path.into(),
            headings,
            page_texts,
            error: None,
        }
    }

    /// Record a document that failed to load.
    pub fn failed(
        filename: impl Into<String>,
        path: impl Into<PathBuf>,
        error: impl Into<String>,
    ) -> Self {
        let filename = filename.into();
        Self {
            title: filename.clone(),
            filename,
            path: path.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Whether the document loaded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Text of one page (empty if the page is missing).
    pub fn page_text(&self, page: u32) -> &str {
        self.page_texts.get(&page).map(String::as_str).unwrap_or("")
    }

    /// Title and heading outline.
    pub fn outline(&self) -> DocumentOutline {
        DocumentOutline::from_headings(&self.headings, &self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record() {
        let record = DocumentRecord::failed("a.pdf", "/tmp/a.pdf", "unreadable");
        assert!(!record.is_ok());
        assert_eq!(record.title, "a.pdf");
        assert_eq!(record.page_text(1), "");
    }

    #[test]
    fn test_loaded_record_title_from_filename() {
        let mut pages = BTreeMap::new();
        pages.insert(1, "Hello".to_string());
        let record = DocumentRecord::loaded("a.pdf", "/tmp/a.pdf", Vec::new(), pages);
        assert!(record.is_ok());
        assert_eq!(record.title, "a.pdf");
        assert_eq!(record.page_text(1), "Hello");
        assert!(record.outline().outline.is_empty());
    }
}
