//! Multi-factor relevance scoring of sections.
//!
//! Each section gets four sub-scores in [0, 1] that are combined into one
//! total:
//!
//! | factor   | weight | signal                                     |
//! |----------|--------|--------------------------------------------|
//! | keyword  | 0.40   | weighted keyword overlap of heading + body |
//! | title    | 0.25   | weighted keyword overlap of heading alone  |
//! | position | 0.20   | linear decay over the candidate list       |
//! | length   | 0.15   | word-count prior peaking at 50-200 words   |

mod index;

pub use index::TokenIndex;

use crate::model::{ScoredSection, Section, SectionScores};
use crate::profile::ProfileAnalysis;

const KEYWORD_WEIGHT: f64 = 0.40;
const TITLE_WEIGHT: f64 = 0.25;
const POSITION_WEIGHT: f64 = 0.20;
const LENGTH_WEIGHT: f64 = 0.15;

const POSITION_FLOOR: f64 = 0.3;

/// How a profile keyword is matched against text tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Match when the keyword contains a token or a token contains it
    #[default]
    Containment,
    /// Match only identical tokens
    Exact,
}

/// Scores and ranks sections against a profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer {
    mode: MatchMode,
}

impl RelevanceScorer {
    /// Create a scorer with containment matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyword matching mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// The keyword matching mode in use.
    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    /// Score one section at a 1-based position among `total` candidates.
    pub fn score(
        &self,
        section: &Section,
        profile: &ProfileAnalysis,
        position: usize,
        total: usize,
    ) -> ScoredSection {
        ScoredSection::new(section.clone(), self.scores(section, profile, position, total))
    }

    /// Sub-scores for one section.
    pub fn scores(
        &self,
        section: &Section,
        profile: &ProfileAnalysis,
        position: usize,
        total: usize,
    ) -> SectionScores {
        let heading = section.heading.trim();
        let body = section.text.trim();
        if heading.is_empty() && body.is_empty() {
            return SectionScores::default();
        }

        let combined = format!("{} {}", heading, body);
        let keyword = self.keyword_score(&combined, profile);
        let title = if heading.is_empty() {
            0.0
        } else {
            self.keyword_score(heading, profile)
        };
        let position = position_score(position, total);
        let length = length_score(body);

        let total = KEYWORD_WEIGHT * keyword
            + TITLE_WEIGHT * title
            + POSITION_WEIGHT * position
            + LENGTH_WEIGHT * length;

        SectionScores {
            keyword: round4(keyword),
            title: round4(title),
            position: round4(position),
            length: round4(length),
            total: round4(total),
        }
    }

    /// Score all sections and sort them by total, best first.
    ///
    /// Ties keep their input order. Ranks are assigned 1..=n after sorting.
    pub fn rank(&self, sections: &[Section], profile: &ProfileAnalysis) -> Vec<ScoredSection> {
        let total = sections.len();
        let mut scored: Vec<ScoredSection> = sections
            .iter()
            .enumerate()
            .map(|(i, section)| self.score(section, profile, i + 1, total))
            .collect();

        scored.sort_by(|a, b| {
            b.total()
                .partial_cmp(&a.total())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::debug!("Ranked {} sections", scored.len());

        scored
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.with_rank(i as u32 + 1))
            .collect()
    }

    /// Weighted share of profile keywords that match the text.
    pub fn keyword_score(&self, text: &str, profile: &ProfileAnalysis) -> f64 {
        if profile.all_keywords.is_empty() || text.trim().is_empty() {
            return 0.0;
        }

        let index = TokenIndex::new(text);
        if index.is_empty() {
            return 0.0;
        }

        let mut total_weight = 0.0;
        let mut matched_weight = 0.0;
        for keyword in &profile.all_keywords {
            let weight = profile.weight(keyword);
            total_weight += weight;
            if index.matches(keyword, self.mode) {
                matched_weight += weight;
            }
        }

        if total_weight > 0.0 {
            matched_weight / total_weight
        } else {
            0.0
        }
    }
}

/// Linear decay from 1.0 at the first position to a floor of 0.3.
pub fn position_score(position: usize, total: usize) -> f64 {
    if total <= 1 {
        return 1.0;
    }
    let decay = 0.7 / (total - 1) as f64;
    let score = 1.0 - position.saturating_sub(1) as f64 * decay;
    score.max(POSITION_FLOOR)
}

/// Word-count prior favouring 50-200 word passages.
pub fn length_score(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    match text.split_whitespace().count() {
        50..=200 => 1.0,
        20..=49 => 0.8,
        201..=400 => 0.9,
        10..=19 => 0.6,
        401..=800 => 0.7,
        _ => 0.4,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
