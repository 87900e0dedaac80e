//! JSON rendering of pipeline results.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::CollectionOutput;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any result type to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write a collection output file.
pub fn write_output<P: AsRef<Path>>(
    output: &CollectionOutput,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let json = to_json(output, format)?;
    std::fs::write(path.as_ref(), json)?;
    log::debug!("Wrote {}", path.as_ref().display());
    Ok(())
}
