//! Error types for docrank.

use std::io;
use thiserror::Error;

/// Result type alias for docrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ranking a collection.
///
/// Scoring never fails: empty keyword sets and empty text resolve to zero
/// scores. Errors are reserved for structural problems with the input and
/// for configuration that cannot be loaded.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in an input descriptor, layout dump or config file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration table or pattern is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The collection directory lacks required structure.
    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    /// Persona or task is missing from the collection input.
    #[error("Missing persona or task information")]
    MissingProfile,

    /// No document in the collection could be loaded.
    #[error("No valid documents in collection")]
    NoValidDocuments,

    /// Text or layout extraction failed for a single document.
    #[error("Extraction failed for {document}: {message}")]
    Extraction {
        /// Document file name
        document: String,
        /// Failure description
        message: String,
    },

    /// Error while serializing output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build an extraction error for a document.
    pub fn extraction(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Extraction {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Whether this error only affects a single document of a collection.
    pub fn is_document_level(&self) -> bool {
        matches!(self, Error::Extraction { .. })
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(err.to_string())
    }
}
