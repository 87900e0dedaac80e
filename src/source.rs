//! Text and layout extraction collaborators.
//!
//! The ranking core never reads PDF bytes. A [`DocumentSource`] hands it
//! per-page text and raw spans for a document path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::RawSpan;

/// Supplies page text and layout spans for a document.
///
/// Implementations return empty data for pages they cannot read. Only a
/// missing or unreadable document is an error.
pub trait DocumentSource: Send + Sync {
    /// Page number (1-indexed) to plain text.
    fn page_texts(&self, path: &Path) -> Result<BTreeMap<u32, String>>;

    /// Every text span of the document.
    fn raw_spans(&self, path: &Path) -> Result<Vec<RawSpan>>;

    /// Both page texts and spans in one read.
    fn load(&self, path: &Path) -> Result<(BTreeMap<u32, String>, Vec<RawSpan>)> {
        Ok((self.page_texts(path)?, self.raw_spans(path)?))
    }
}

/// One page of a layout dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Plain text of the page
    #[serde(default)]
    pub text: String,
    /// Text spans on the page
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

/// A document's layout dump as written by an external extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Pages in document order
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
}

impl LayoutDocument {
    /// Read a layout dump from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse a layout dump.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Page number to text.
    pub fn page_texts(&self) -> BTreeMap<u32, String> {
        self.pages
            .iter()
            .map(|p| (p.number, p.text.clone()))
            .collect()
    }

    /// All spans, with each span's page set from its page entry.
    pub fn spans(&self) -> Vec<RawSpan> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.spans.iter().cloned().map(move |mut span| {
                    if span.page == 0 {
                        span.page = page.number;
                    }
                    span
                })
            })
            .collect()
    }
}

/// Reads `*.layout.json` dumps stored next to each document.
///
/// For `guide.pdf` the source looks for `guide.pdf.layout.json`, then
/// `guide.layout.json`. A path ending in `.json` is read directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutJsonSource;

impl LayoutJsonSource {
    /// Create a new layout source.
    pub fn new() -> Self {
        Self
    }

    /// Resolve the dump file for a document path.
    pub fn layout_path(&self, path: &Path) -> Result<PathBuf> {
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            return existing(path.to_path_buf(), path);
        }

        let mut appended = path.as_os_str().to_owned();
        appended.push(".layout.json");
        let appended = PathBuf::from(appended);
        if appended.is_file() {
            return Ok(appended);
        }

        existing(path.with_extension("layout.json"), path)
    }

    fn read(&self, path: &Path) -> Result<LayoutDocument> {
        let layout = self.layout_path(path)?;
        LayoutDocument::from_file(&layout)
            .map_err(|e| Error::extraction(file_name(path), e.to_string()))
    }
}

impl DocumentSource for LayoutJsonSource {
    fn page_texts(&self, path: &Path) -> Result<BTreeMap<u32, String>> {
        Ok(self.read(path)?.page_texts())
    }

    fn raw_spans(&self, path: &Path) -> Result<Vec<RawSpan>> {
        Ok(self.read(path)?.spans())
    }

    fn load(&self, path: &Path) -> Result<(BTreeMap<u32, String>, Vec<RawSpan>)> {
        let document = self.read(path)?;
        Ok((document.page_texts(), document.spans()))
    }
}

fn existing(candidate: PathBuf, document: &Path) -> Result<PathBuf> {
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(Error::extraction(
            file_name(document),
            format!("no layout data found at {}", candidate.display()),
        ))
    }
}

/// Final path component as a string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LAYOUT: &str = r#"{
        "pages": [
            {"number": 1, "text": "Guide\nWelcome.", "spans": [
                {"text": "Guide", "font_size": 24.0, "is_bold": true, "page": 0}
            ]},
            {"number": 2, "text": "More text."}
        ]
    }"#;

    #[test]
    fn test_layout_document_parse() {
        let doc = LayoutDocument::from_json(LAYOUT).unwrap();
        let texts = doc.page_texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[&2], "More text.");
        let spans = doc.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].page, 1);
        assert!(spans[0].is_bold);
    }

    #[test]
    fn test_resolves_sidecar_files() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("guide.pdf");
        fs::write(&pdf, b"%PDF-1.7").unwrap();
        fs::write(dir.path().join("guide.pdf.layout.json"), LAYOUT).unwrap();

        let source = LayoutJsonSource::new();
        let (texts, spans) = source.load(&pdf).unwrap();
        assert_eq!(texts.len(), 2);
        assert_eq!(spans.len(), 1);

        let other = dir.path().join("other.pdf");
        fs::write(dir.path().join("other.layout.json"), LAYOUT).unwrap();
        assert_eq!(
            source.layout_path(&other).unwrap(),
            dir.path().join("other.layout.json")
        );
    }

    #[test]
    fn test_missing_layout_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LayoutJsonSource::new()
            .page_texts(&dir.path().join("missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { ref document, .. } if document == "missing.pdf"));
    }

    #[test]
    fn test_malformed_layout_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LayoutJsonSource::new().raw_spans(&path),
            Err(Error::Extraction { .. })
        ));
    }
}
