//! # docrank
//!
//! Persona-driven passage ranking for multi-document collections.
//!
//! Given a reader persona ("Travel Planner") and a task ("Plan a 4-day trip
//! for a group of friends"), docrank finds the sections of a document
//! collection that matter most and pulls refined, non-redundant excerpts
//! from them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docrank::{rank_collection, to_json, JsonFormat};
//!
//! fn main() -> docrank::Result<()> {
//!     let output = rank_collection("Collections/Collection 1")?;
//!     println!("{}", to_json(&output, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Heading detection**: font statistics and exclusion patterns turn raw
//!   layout spans into leveled headings
//! - **Profile analysis**: weighted keywords and domains from persona and task
//! - **Relevance scoring**: keyword, title, position and length signals
//! - **Diversification**: every document is represented before any repeats
//! - **Subsection extraction**: chunking, scoring, deduplication, refinement
//!
//! Text and layout come from a [`DocumentSource`]. The bundled
//! [`LayoutJsonSource`] reads layout dumps written next to each document.

pub mod config;
pub mod diversify;
pub mod error;
pub mod extract;
pub mod heading;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod score;
pub mod source;

mod text;

// Re-export commonly used types
pub use config::{ExtractOptions, PipelineOptions, RankConfig};
pub use diversify::diversify;
pub use error::{Error, Result};
pub use extract::SubsectionExtractor;
pub use heading::{ExclusionClassifier, HeadingDetector};
pub use model::{
    CollectionInput, CollectionOutput, DocumentOutline, DocumentRecord, Excerpt,
    HeadingCandidate, RawSpan, ScoredSection, Section,
};
pub use pipeline::{discover_collections, to_json, CollectionProcessor, JsonFormat};
pub use profile::{ProfileAnalysis, ProfileAnalyzer};
pub use score::{MatchMode, RelevanceScorer};
pub use source::{DocumentSource, LayoutJsonSource};

use std::path::Path;

/// Rank a collection directory with the default settings.
///
/// # Example
///
/// ```no_run
/// let output = docrank::rank_collection("Collections/Collection 1")?;
/// for section in &output.extracted_sections {
///     println!("{} {}", section.importance_rank, section.section_title);
/// }
/// # Ok::<(), docrank::Error>(())
/// ```
pub fn rank_collection<P: AsRef<Path>>(dir: P) -> Result<CollectionOutput> {
    Docrank::new().process(dir)
}

/// Analyze a persona and task with the built-in tables.
///
/// # Example
///
/// ```
/// let profile = docrank::analyze_profile("Legal Document Analyst", "Review contract obligations");
/// assert!(profile.task_keywords.contains("contract"));
/// ```
pub fn analyze_profile(persona: &str, task: &str) -> ProfileAnalysis {
    ProfileAnalyzer::embedded().analyze(persona, task)
}

/// Detect headings in raw spans with the built-in exclusion patterns.
pub fn detect_headings(spans: &[RawSpan]) -> Result<Vec<HeadingCandidate>> {
    Ok(HeadingDetector::embedded()?.detect(spans))
}

/// Title and heading outline of a document's layout dump.
///
/// # Example
///
/// ```no_run
/// let outline = docrank::outline_file("guide.pdf.layout.json")?;
/// println!("{}", outline.title);
/// # Ok::<(), docrank::Error>(())
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    let path = path.as_ref();
    let spans = LayoutJsonSource::new().raw_spans(path)?;
    let name = source::file_name(path);
    Ok(HeadingDetector::embedded()?.outline(&spans, &name))
}

/// Builder for ranking collections.
///
/// # Example
///
/// ```no_run
/// use docrank::Docrank;
///
/// let output = Docrank::new()
///     .with_max_sections(10)
///     .with_max_excerpts(5)
///     .sequential()
///     .process("Collections/Collection 2")?;
/// # Ok::<(), docrank::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docrank {
    config: Option<RankConfig>,
    options: PipelineOptions,
}

impl Docrank {
    /// Create a new builder with the built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use loaded configuration tables instead of the built-in ones.
    pub fn with_config(mut self, config: RankConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace all pipeline options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Limit the number of ranked sections.
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.options = self.options.with_max_sections(max);
        self
    }

    /// Limit the number of excerpts.
    pub fn with_max_excerpts(mut self, max: usize) -> Self {
        self.options = self.options.with_max_excerpts(max);
        self
    }

    /// Set the keyword matching mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.options = self.options.with_match_mode(mode);
        self
    }

    /// Disable parallel document loading.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Build the collection processor.
    pub fn build(self) -> Result<CollectionProcessor> {
        match &self.config {
            Some(config) => CollectionProcessor::with_config(config, self.options),
            None => CollectionProcessor::new(self.options),
        }
    }

    /// Build a processor and rank one collection.
    pub fn process<P: AsRef<Path>>(self, dir: P) -> Result<CollectionOutput> {
        self.build()?.process_collection(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_options() {
        let builder = Docrank::new()
            .with_max_sections(3)
            .with_max_excerpts(4)
            .with_match_mode(MatchMode::Exact)
            .sequential();
        let processor = builder.build().unwrap();
        assert_eq!(processor.options().max_sections, Some(3));
        assert_eq!(processor.options().max_excerpts, 4);
        assert_eq!(processor.options().match_mode, MatchMode::Exact);
        assert!(!processor.options().parallel);
    }

    #[test]
    fn test_builder_with_config() {
        let config = RankConfig::from_json(r#"{"exclusion_patterns": {"X": "(unclosed"}}"#).unwrap();
        assert!(matches!(
            Docrank::new().with_config(config).build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_analyze_profile() {
        let profile = analyze_profile("Travel Planner", "Plan a trip");
        assert!(profile.all_keywords.contains("trip"));
        assert_eq!(profile.persona, "Travel Planner");
    }
}
