//! Collection directory layout: discovery and validation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::CollectionInput;

/// File name of the output written into each collection.
pub const OUTPUT_FILE_NAME: &str = "challenge1b_output.json";

/// Expected input descriptor name, used in error messages.
pub const INPUT_FILE_NAME: &str = "challenge1b_input.json";

/// Folder names (case-insensitive) that hold a collection's documents.
const DOCUMENT_DIRS: &[&str] = &["pdf", "pdfs"];

/// A validated collection directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionLayout {
    /// Collection root
    pub root: PathBuf,
    /// Input descriptor (`*input.json`)
    pub input_file: PathBuf,
    /// Folder holding the documents
    pub documents_dir: PathBuf,
    /// Document paths, sorted
    pub documents: Vec<PathBuf>,
}

impl CollectionLayout {
    /// Validate a collection directory.
    ///
    /// The directory must contain a `*input.json` descriptor and a `PDFs`
    /// (or `pdf`, any case) folder with at least one `*.pdf` file.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::InvalidCollection(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let input_file = find_input_file(&root)?;

        let documents_dir = sorted_entries(&root)?
            .into_iter()
            .find(|path| {
                path.is_dir()
                    && path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_lowercase())
                        .is_some_and(|n| DOCUMENT_DIRS.contains(&n.as_str()))
            })
            .ok_or_else(|| Error::InvalidCollection("No PDF/PDFs folder found".to_string()))?;

        let documents: Vec<PathBuf> = sorted_entries(&documents_dir)?
            .into_iter()
            .filter(|path| path.is_file() && has_extension(path, "pdf"))
            .collect();
        if documents.is_empty() {
            return Err(Error::InvalidCollection(format!(
                "No PDF files found in {}",
                documents_dir.display()
            )));
        }

        Ok(Self {
            root,
            input_file,
            documents_dir,
            documents,
        })
    }

    /// Collection name (last path component).
    pub fn name(&self) -> String {
        crate::source::file_name(&self.root)
    }

    /// Parse the input descriptor.
    pub fn load_input(&self) -> Result<CollectionInput> {
        CollectionInput::from_file(&self.input_file)
    }

    /// Default output path inside the collection.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(OUTPUT_FILE_NAME)
    }
}

/// Find collection directories under `base`.
///
/// Subdirectories of `base/Collections` when that folder exists, otherwise
/// subdirectories of `base` whose name starts with "collection" (any case).
/// Results are sorted.
pub fn discover_collections<P: AsRef<Path>>(base: P) -> Result<Vec<PathBuf>> {
    let base = base.as_ref();
    let nested = base.join("Collections");

    let collections: Vec<PathBuf> = if nested.is_dir() {
        log::debug!("Scanning {}", nested.display());
        sorted_entries(&nested)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect()
    } else {
        sorted_entries(base)?
            .into_iter()
            .filter(|p| {
                p.is_dir()
                    && p.file_name()
                        .map(|n| n.to_string_lossy().to_lowercase().starts_with("collection"))
                        .unwrap_or(false)
            })
            .collect()
    };

    log::debug!("Found {} collections in {}", collections.len(), base.display());
    Ok(collections)
}

fn find_input_file(root: &Path) -> Result<PathBuf> {
    let entries = sorted_entries(root)?;
    if let Some(input) = entries.iter().find(|p| {
        p.is_file()
            && p.file_name()
                .map(|n| n.to_string_lossy().ends_with("input.json"))
                .unwrap_or(false)
    }) {
        return Ok(input.clone());
    }

    let misnamed = entries.iter().find_map(|p| {
        let name = p.file_name()?.to_string_lossy().into_owned();
        (name.ends_with(".json") && name.to_lowercase().contains("input")).then_some(name)
    });
    Err(Error::InvalidCollection(match misnamed {
        Some(name) => format!(
            "Input file found but with incorrect name: '{}'. Required name: '{}'",
            name, INPUT_FILE_NAME
        ),
        None => format!("No input.json file found. Required name: '{}'", INPUT_FILE_NAME),
    }))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
