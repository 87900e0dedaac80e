//! Collection orchestration.
//!
//! Documents are loaded in parallel, turned into sections, ranked against
//! the reader profile, diversified across documents and reduced to refined
//! excerpts. Failures of single documents are recorded in the output and
//! never stop their siblings.

mod collection;
mod output;
mod sections;

pub use collection::{discover_collections, CollectionLayout, INPUT_FILE_NAME, OUTPUT_FILE_NAME};
pub use output::{to_json, write_output, JsonFormat};
pub use sections::{
    content_from_page, fallback_excerpt, page_title, SectionBuilder, PAGE_FALLBACK_WORDS,
    SHORT_SECTION_CHARS,
};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::{PipelineOptions, RankConfig};
use crate::diversify::diversify;
use crate::error::{Error, Result};
use crate::extract::SubsectionExtractor;
use crate::heading::HeadingDetector;
use crate::model::{
    CollectionOutput, DocumentError, DocumentRecord, Excerpt, ExtractedSection, OutputMetadata,
    ScoredSection, SubsectionAnalysis,
};
use crate::profile::{ProfileAnalysis, ProfileAnalyzer};
use crate::score::RelevanceScorer;
use crate::source::{file_name, DocumentSource, LayoutJsonSource};
use crate::text::word_jaccard;

/// Runs the ranking pipeline over document collections.
pub struct CollectionProcessor {
    source: Box<dyn DocumentSource>,
    detector: HeadingDetector,
    analyzer: ProfileAnalyzer,
    scorer: RelevanceScorer,
    extractor: SubsectionExtractor,
    sections: SectionBuilder,
    options: PipelineOptions,
}

impl CollectionProcessor {
    /// Processor with the built-in tables, reading layout JSON dumps.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        Ok(Self::assemble(
            HeadingDetector::embedded()?,
            ProfileAnalyzer::embedded(),
            options,
        ))
    }

    /// Processor over loaded configuration tables.
    pub fn with_config(config: &RankConfig, options: PipelineOptions) -> Result<Self> {
        Ok(Self::assemble(
            HeadingDetector::from_patterns(&config.exclusion_patterns)?,
            ProfileAnalyzer::from_config(config.profile.clone()),
            options,
        ))
    }

    fn assemble(
        detector: HeadingDetector,
        analyzer: ProfileAnalyzer,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source: Box::new(LayoutJsonSource::new()),
            detector,
            analyzer,
            scorer: RelevanceScorer::new().with_match_mode(options.match_mode),
            extractor: SubsectionExtractor::new(options.extract.clone()),
            sections: SectionBuilder::new(options.section_char_cap),
            options,
        }
    }

    /// Read documents through another extraction collaborator.
    pub fn with_source<S: DocumentSource + 'static>(mut self, source: S) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Replace the profile analyzer.
    pub fn with_analyzer(mut self, analyzer: ProfileAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The profile analyzer in use.
    pub fn analyzer(&self) -> &ProfileAnalyzer {
        &self.analyzer
    }

    /// The heading detector in use.
    pub fn detector(&self) -> &HeadingDetector {
        &self.detector
    }

    /// Validate, load and rank one collection directory.
    pub fn process_collection<P: AsRef<Path>>(&self, dir: P) -> Result<CollectionOutput> {
        let layout = CollectionLayout::open(dir)?;
        let input = layout.load_input()?;
        let (persona, task) = (input.persona(), input.task());
        if persona.is_empty() || task.is_empty() {
            return Err(Error::MissingProfile);
        }

        log::debug!(
            "Collection {}: {} documents",
            layout.name(),
            layout.documents.len()
        );
        self.process_documents(&layout.documents, &persona, &task)
    }

    /// Process a collection and write its output file.
    ///
    /// Returns the output and the path it was written to.
    pub fn process_and_write<P: AsRef<Path>>(
        &self,
        dir: P,
        output_path: Option<&Path>,
        format: JsonFormat,
    ) -> Result<(CollectionOutput, PathBuf)> {
        let dir = dir.as_ref();
        let output = self.process_collection(dir)?;
        let path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.join(OUTPUT_FILE_NAME));
        write_output(&output, &path, format)?;
        Ok((output, path))
    }

    /// Load and rank an explicit list of documents.
    pub fn process_documents(
        &self,
        paths: &[PathBuf],
        persona: &str,
        task: &str,
    ) -> Result<CollectionOutput> {
        if persona.trim().is_empty() || task.trim().is_empty() {
            return Err(Error::MissingProfile);
        }
        let records = self.load_documents(paths);
        self.rank(&records, persona, task)
    }

    /// Load one document. Failures are captured in the record.
    pub fn load_document(&self, path: &Path) -> DocumentRecord {
        let filename = file_name(path);
        match self.source.load(path) {
            Ok((page_texts, spans)) => {
                let headings = self.detector.detect(&spans);
                log::debug!(
                    "{}: {} pages, {} headings",
                    filename,
                    page_texts.len(),
                    headings.len()
                );
                DocumentRecord::loaded(filename, path, headings, page_texts)
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", filename, e);
                DocumentRecord::failed(filename, path, e.to_string())
            }
        }
    }

    /// Load documents on a bounded pool, sorted by file name.
    pub fn load_documents(&self, paths: &[PathBuf]) -> Vec<DocumentRecord> {
        let mut records: Vec<DocumentRecord> = if self.options.parallel && paths.len() > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.worker_count())
                .build()
            {
                Ok(pool) => pool.install(|| {
                    paths
                        .par_iter()
                        .map(|path| self.load_document(path))
                        .collect()
                }),
                Err(e) => {
                    log::warn!("Worker pool unavailable ({}), loading sequentially", e);
                    self.load_sequential(paths)
                }
            }
        } else {
            self.load_sequential(paths)
        };

        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        records
    }

    fn load_sequential(&self, paths: &[PathBuf]) -> Vec<DocumentRecord> {
        paths.iter().map(|path| self.load_document(path)).collect()
    }

    /// Rank already loaded documents.
    pub fn rank(
        &self,
        records: &[DocumentRecord],
        persona: &str,
        task: &str,
    ) -> Result<CollectionOutput> {
        let (persona, task) = (persona.trim(), task.trim());
        if persona.is_empty() || task.is_empty() {
            return Err(Error::MissingProfile);
        }

        let valid: Vec<&DocumentRecord> = records.iter().filter(|r| r.is_ok()).collect();
        if valid.is_empty() {
            return Err(Error::NoValidDocuments);
        }

        let profile = self.analyzer.analyze(persona, task);
        let sections: Vec<_> = valid
            .iter()
            .flat_map(|record| self.sections.build(record))
            .collect();

        let ranked = self.scorer.rank(&sections, &profile);
        let selected = diversify(&ranked, self.options.max_sections);
        let excerpts = self.excerpts(&selected, &profile);

        log::debug!(
            "{} sections, {} selected, {} excerpts",
            sections.len(),
            selected.len(),
            excerpts.len()
        );

        Ok(CollectionOutput {
            metadata: OutputMetadata::now(
                valid.iter().map(|r| r.filename.clone()).collect(),
                persona,
                task,
            ),
            extracted_sections: selected
                .iter()
                .enumerate()
                .map(|(i, s)| ExtractedSection {
                    document: s.section.filename.clone(),
                    section_title: s.section.heading.clone(),
                    importance_rank: i as u32 + 1,
                    page_number: s.section.page,
                })
                .collect(),
            subsection_analysis: excerpts
                .into_iter()
                .map(|e| SubsectionAnalysis {
                    document: e.document,
                    refined_text: e.refined_text,
                    page_number: e.page_number,
                })
                .collect(),
            document_errors: records
                .iter()
                .filter_map(|r| {
                    r.error.as_ref().map(|error| DocumentError {
                        document: r.filename.clone(),
                        error: error.clone(),
                    })
                })
                .collect(),
        })
    }

    /// Extracted excerpts, plus a stand-in for every selected document
    /// that yielded none.
    fn excerpts(&self, selected: &[ScoredSection], profile: &ProfileAnalysis) -> Vec<Excerpt> {
        let max_total = self.options.max_excerpts;
        let mut excerpts = self.extractor.extract(selected, profile, max_total);
        let overlap = self.extractor.options().final_overlap;

        let mut covered: BTreeSet<String> =
            excerpts.iter().map(|e| e.document.clone()).collect();
        for scored in selected {
            if excerpts.len() >= max_total {
                break;
            }
            let section = &scored.section;
            if covered.contains(&section.filename) {
                continue;
            }
            covered.insert(section.filename.clone());

            let refined = self.extractor.refiner().refine(&section.text);
            let excerpt = fallback_excerpt(section, &refined, scored.total());
            if excerpts
                .iter()
                .all(|e| word_jaccard(&e.refined_text, &excerpt.refined_text) <= overlap)
            {
                log::warn!("No excerpt found in {}, using fallback", section.filename);
                excerpts.push(excerpt);
            }
        }
        excerpts
    }
}
