//! Pipeline options and configuration.

use crate::score::MatchMode;

/// Upper bound on concurrently loaded documents.
pub const MAX_WORKERS: usize = 4;

/// Options for ranking a collection.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum ranked sections in the output (None = all)
    pub max_sections: Option<usize>,

    /// Maximum excerpts in the output
    pub max_excerpts: usize,

    /// Whether to load documents in parallel
    pub parallel: bool,

    /// Worker cap for parallel loading
    pub max_workers: usize,

    /// Character cap for a section's body text
    pub section_char_cap: usize,

    /// Keyword matching mode for section scoring
    pub match_mode: MatchMode,

    /// Excerpt extraction options
    pub extract: ExtractOptions,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of ranked sections.
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = Some(max);
        self
    }

    /// Limit the number of excerpts.
    pub fn with_max_excerpts(mut self, max: usize) -> Self {
        self.max_excerpts = max;
        self
    }

    /// Enable or disable parallel document loading.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel document loading.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the worker cap (clamped to 1..=MAX_WORKERS).
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Set the section body character cap.
    pub fn with_section_char_cap(mut self, cap: usize) -> Self {
        self.section_char_cap = cap;
        self
    }

    /// Set the keyword matching mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Set excerpt extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Number of workers to use for this machine.
    pub fn worker_count(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        available.min(self.max_workers).max(1)
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_sections: None,
            max_excerpts: 10,
            parallel: true,
            max_workers: MAX_WORKERS,
            section_char_cap: 1000,
            match_mode: MatchMode::Containment,
            extract: ExtractOptions::default(),
        }
    }
}

/// Options for excerpt extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Minimum characters for a chunk
    pub min_chunk_len: usize,

    /// Shortest paragraph worth extending with context
    pub min_extendable_len: usize,

    /// Characters of context added on each side of a short paragraph
    pub context_chars: usize,

    /// Maximum refined excerpt length
    pub max_excerpt_len: usize,

    /// Minimum refined excerpt length
    pub min_refined_len: usize,

    /// Jaccard ceiling between chunks of one section
    pub local_overlap: f64,

    /// Jaccard ceiling between final excerpts
    pub final_overlap: f64,

    /// Scores at or below this are discarded
    pub min_score: f64,

    /// Excerpts per document while some document is unrepresented
    pub per_document_cap: usize,

    /// Verbs that mark actionable content
    pub action_verbs: Vec<String>,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum refined excerpt length.
    pub fn with_max_excerpt_len(mut self, len: usize) -> Self {
        self.max_excerpt_len = len;
        self
    }

    /// Set the minimum chunk length.
    pub fn with_min_chunk_len(mut self, len: usize) -> Self {
        self.min_chunk_len = len;
        self
    }

    /// Set the per-document cap.
    pub fn with_per_document_cap(mut self, cap: usize) -> Self {
        self.per_document_cap = cap.max(1);
        self
    }

    /// Replace the action verb list.
    pub fn with_action_verbs<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action_verbs = verbs.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_chunk_len: 100,
            min_extendable_len: 50,
            context_chars: 200,
            max_excerpt_len: 600,
            min_refined_len: 80,
            local_overlap: 0.6,
            final_overlap: 0.5,
            min_score: 0.1,
            per_document_cap: 2,
            action_verbs: [
                "visit", "try", "explore", "enjoy", "experience", "discover", "learn", "take",
                "go",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_options_builder() {
        let options = PipelineOptions::new()
            .with_max_sections(3)
            .with_max_excerpts(4)
            .with_max_workers(16)
            .sequential();

        assert_eq!(options.max_sections, Some(3));
        assert_eq!(options.max_excerpts, 4);
        assert_eq!(options.max_workers, MAX_WORKERS);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = PipelineOptions::default();
        assert!(options.parallel);
        assert_eq!(options.match_mode, MatchMode::Containment);
        assert_eq!(options.extract.max_excerpt_len, 600);
        assert!(options.worker_count() >= 1);
        assert!(options.worker_count() <= MAX_WORKERS);
    }

    #[test]
    fn test_sections_uncapped_by_default() {
        assert_eq!(PipelineOptions::default().max_sections, None);
    }
}
