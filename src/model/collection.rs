//! Collection input descriptor and ranked output records.
//!
//! Field names here are a persisted contract: existing consumers read the
//! snake_case JSON produced by these types, so they must not be renamed.

use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Descriptor of a collection run (`*input.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionInput {
    /// Challenge bookkeeping, may also carry persona/task
    #[serde(default)]
    pub challenge_info: ChallengeInfo,
    /// Documents declared for the collection
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    /// Reader persona
    #[serde(default)]
    pub persona: Option<PersonaField>,
    /// Reader task
    #[serde(default)]
    pub job_to_be_done: Option<TaskField>,
}

/// Challenge metadata block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

/// A document declared in the collection input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Persona given either as `{"role": ".."}` or a bare string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonaField {
    Role { role: String },
    Text(String),
}

/// Task given either as `{"task": ".."}` or a bare string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskField {
    Task { task: String },
    Text(String),
}

impl CollectionInput {
    /// Load an input descriptor from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse an input descriptor from JSON text.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Create a descriptor from a persona and task.
    pub fn new(persona: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            persona: Some(PersonaField::Text(persona.into())),
            job_to_be_done: Some(TaskField::Text(task.into())),
            ..Default::default()
        }
    }

    /// Resolved persona, falling back to `challenge_info`.
    pub fn persona(&self) -> String {
        let direct = match &self.persona {
            Some(PersonaField::Role { role }) => role.clone(),
            Some(PersonaField::Text(text)) => text.clone(),
            None => String::new(),
        };
        if !direct.trim().is_empty() {
            return direct.trim().to_string();
        }
        let info = &self.challenge_info;
        info.persona
            .clone()
            .or_else(|| info.role.clone())
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    /// Resolved task, falling back to `challenge_info`.
    pub fn task(&self) -> String {
        let direct = match &self.job_to_be_done {
            Some(TaskField::Task { task }) => task.clone(),
            Some(TaskField::Text(text)) => text.clone(),
            None => String::new(),
        };
        if !direct.trim().is_empty() {
            return direct.trim().to_string();
        }
        let info = &self.challenge_info;
        info.task
            .clone()
            .or_else(|| info.description.clone())
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Result of ranking a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionOutput {
    /// Run metadata
    pub metadata: OutputMetadata,
    /// Ranked sections
    pub extracted_sections: Vec<ExtractedSection>,
    /// Refined excerpts
    pub subsection_analysis: Vec<SubsectionAnalysis>,
    /// Per-document failures (omitted when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub document_errors: Vec<DocumentError>,
}

/// Metadata block of the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Documents that were loaded successfully
    pub input_documents: Vec<String>,
    /// Persona text
    pub persona: String,
    /// Task text
    pub job_to_be_done: String,
    /// Local timestamp of the run (ISO 8601)
    pub processing_timestamp: String,
}

impl OutputMetadata {
    /// Create metadata stamped with the current local time.
    pub fn now(input_documents: Vec<String>, persona: &str, task: &str) -> Self {
        Self {
            input_documents,
            persona: persona.to_string(),
            job_to_be_done: task.to_string(),
            processing_timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }
}

/// A ranked section in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

/// A refined excerpt in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// A document that failed to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentError {
    pub document: String,
    pub error: String,
}
