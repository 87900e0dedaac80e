//! Persona and task analysis.
//!
//! Turns free-text persona and task descriptions into weighted keyword
//! sets. Tables are owned configuration: they are injected at construction
//! and can be extended at runtime.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::{KeywordTable, ProfileConfig};
use crate::text::word_tokens;

/// Minimum characters for an extracted keyword.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Keyword weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightScheme {
    /// Weight for keywords in both persona and task
    pub overlap: f64,
    /// Weight for persona-only keywords
    pub persona_only: f64,
    /// Weight for task-only keywords
    pub task_only: f64,
    /// Length bonuses as (minimum length exclusive, multiplier), checked in order
    pub length_bonus: &'static [(usize, f64)],
}

impl WeightScheme {
    /// Weights used with configured tables.
    pub const STANDARD: Self = Self {
        overlap: 2.0,
        persona_only: 1.5,
        task_only: 1.2,
        length_bonus: &[(8, 1.1)],
    };

    /// Weights used with the built-in tables.
    pub const BOOSTED: Self = Self {
        overlap: 2.5,
        persona_only: 1.5,
        task_only: 1.3,
        length_bonus: &[(10, 1.3), (7, 1.2)],
    };

    /// Weight for a keyword given its membership.
    pub fn weight(&self, keyword: &str, in_persona: bool, in_task: bool) -> f64 {
        let base = match (in_persona, in_task) {
            (true, true) => self.overlap,
            (true, false) => self.persona_only,
            (false, true) => self.task_only,
            (false, false) => 1.0,
        };

        let len = keyword.chars().count();
        let bonus = self
            .length_bonus
            .iter()
            .find(|(min, _)| len > *min)
            .map(|(_, multiplier)| *multiplier)
            .unwrap_or(1.0);

        base * bonus
    }
}

/// Limits on how many table keywords are pulled into the task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordLimits {
    /// Keywords taken from each matched task pattern (None = all)
    pub per_task_pattern: Option<usize>,
    /// Keywords taken from the top task domain
    pub task_domain: usize,
    /// Persona domains whose indicators are added
    pub persona_domains: usize,
}

impl KeywordLimits {
    /// Limits used with configured tables.
    pub const STANDARD: Self = Self {
        per_task_pattern: None,
        task_domain: 10,
        persona_domains: 2,
    };

    /// Limits used with the built-in tables.
    pub const EMBEDDED: Self = Self {
        per_task_pattern: Some(5),
        task_domain: 8,
        persona_domains: 2,
    };
}

/// Result of analyzing a persona and task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    /// Persona text as given
    pub persona: String,
    /// Task text as given
    pub task: String,
    /// Keywords derived from the persona
    pub persona_keywords: BTreeSet<String>,
    /// Keywords derived from the task
    pub task_keywords: BTreeSet<String>,
    /// Union of persona and task keywords
    pub all_keywords: BTreeSet<String>,
    /// Weight of every keyword in the union
    pub keyword_weights: BTreeMap<String, f64>,
    /// Domains detected in the persona, strongest first
    pub persona_domains: Vec<String>,
    /// Domains detected in the task, strongest first
    pub task_domains: Vec<String>,
}

impl ProfileAnalysis {
    /// Whether no keywords were extracted.
    pub fn is_empty(&self) -> bool {
        self.all_keywords.is_empty()
    }

    /// Weight of a keyword (1.0 if unknown).
    pub fn weight(&self, keyword: &str) -> f64 {
        self.keyword_weights.get(keyword).copied().unwrap_or(1.0)
    }
}

/// Extracts weighted keywords from persona and task descriptions.
#[derive(Debug, Clone)]
pub struct ProfileAnalyzer {
    config: ProfileConfig,
    scheme: WeightScheme,
    limits: KeywordLimits,
}

impl ProfileAnalyzer {
    /// Analyzer over configured tables with standard weights.
    pub fn from_config(config: ProfileConfig) -> Self {
        Self {
            config,
            scheme: WeightScheme::STANDARD,
            limits: KeywordLimits::STANDARD,
        }
    }

    /// Analyzer over the built-in tables with boosted weights.
    pub fn embedded() -> Self {
        Self {
            config: ProfileConfig::embedded(),
            scheme: WeightScheme::BOOSTED,
            limits: KeywordLimits::EMBEDDED,
        }
    }

    /// Override the weighting scheme.
    pub fn with_scheme(mut self, scheme: WeightScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Override the keyword limits.
    pub fn with_limits(mut self, limits: KeywordLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The tables in use.
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// The weighting scheme in use.
    pub fn scheme(&self) -> WeightScheme {
        self.scheme
    }

    /// Add indicator keywords to a domain, creating it if needed.
    pub fn extend_domain(&mut self, domain: &str, keywords: &[&str]) {
        self.config.extend_domain(domain, keywords);
    }

    /// Add keywords to a task pattern, creating it if needed.
    pub fn extend_task_pattern(&mut self, pattern: &str, keywords: &[&str]) {
        self.config.extend_task_pattern(pattern, keywords);
    }

    /// Analyze a persona and task.
    ///
    /// An empty persona or task yields empty keyword sets.
    pub fn analyze(&self, persona: &str, task: &str) -> ProfileAnalysis {
        let mut analysis = ProfileAnalysis {
            persona: persona.to_string(),
            task: task.to_string(),
            ..Default::default()
        };

        if persona.trim().is_empty() || task.trim().is_empty() {
            log::debug!("Empty persona or task, no keywords extracted");
            return analysis;
        }

        analysis.persona_domains = self.detect_domains(persona);
        analysis.task_domains = self.detect_domains(task);
        analysis.persona_keywords = self.persona_keywords(persona, &analysis.persona_domains);
        analysis.task_keywords = self.task_keywords(task, &analysis.task_domains);
        analysis.all_keywords = analysis
            .persona_keywords
            .union(&analysis.task_keywords)
            .cloned()
            .collect();
        analysis.keyword_weights = analysis
            .all_keywords
            .iter()
            .map(|k| {
                let weight = self.scheme.weight(
                    k,
                    analysis.persona_keywords.contains(k),
                    analysis.task_keywords.contains(k),
                );
                (k.clone(), weight)
            })
            .collect();

        log::debug!(
            "Profile: {} persona keywords, {} task keywords, domains {:?} / {:?}",
            analysis.persona_keywords.len(),
            analysis.task_keywords.len(),
            analysis.persona_domains,
            analysis.task_domains
        );

        analysis
    }

    /// Lowercased tokens of at least three word characters, minus stop words.
    pub fn extract_keywords(&self, text: &str) -> BTreeSet<String> {
        let lower = text.to_lowercase();
        word_tokens(&lower, MIN_KEYWORD_CHARS)
            .filter(|w| !self.config.stop_words.contains(*w))
            .map(str::to_string)
            .collect()
    }

    /// Domains whose indicators occur in the text, by hit count descending
    /// and then by table order.
    pub fn detect_domains(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut hits: Vec<(&str, usize)> = self
            .config
            .domains
            .iter()
            .map(|(domain, indicators)| {
                let count = indicators
                    .iter()
                    .filter(|k| lower.contains(k.as_str()))
                    .count();
                (domain, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        // Stable sort keeps table order among tied domains
        hits.sort_by(|a, b| b.1.cmp(&a.1));
        hits.into_iter().map(|(domain, _)| domain.to_string()).collect()
    }

    fn persona_keywords(&self, persona: &str, domains: &[String]) -> BTreeSet<String> {
        let mut keywords = self.extract_keywords(persona);
        for domain in domains.iter().take(self.limits.persona_domains) {
            keywords.extend(domain_keywords(&self.config.domains, domain, usize::MAX));
        }
        keywords
    }

    fn task_keywords(&self, task: &str, domains: &[String]) -> BTreeSet<String> {
        let mut keywords = self.extract_keywords(task);
        let lower = task.to_lowercase();

        for pattern in self.config.task_patterns.values() {
            if pattern.iter().any(|trigger| lower.contains(trigger.as_str())) {
                let limit = self.limits.per_task_pattern.unwrap_or(pattern.len());
                keywords.extend(pattern.iter().take(limit).cloned());
            }
        }

        if let Some(domain) = domains.first() {
            keywords.extend(domain_keywords(
                &self.config.domains,
                domain,
                self.limits.task_domain,
            ));
        }

        keywords
    }
}

impl Default for ProfileAnalyzer {
    fn default() -> Self {
        Self::embedded()
    }
}

fn domain_keywords<'a>(
    table: &'a KeywordTable,
    domain: &str,
    limit: usize,
) -> impl Iterator<Item = String> + 'a {
    table
        .get(domain)
        .into_iter()
        .flat_map(move |keywords| keywords.iter().take(limit).cloned())
}
