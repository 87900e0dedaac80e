//! Subsection extraction.
//!
//! Ranked sections are split into chunks, the best non-redundant chunks of
//! each section are refined into excerpts, and a final cross-document pass
//! picks the excerpts for output:
//!
//! 1. Coverage: the best excerpt of every document, in score order.
//! 2. Fill: the remaining excerpts in score order, at most
//!    `per_document_cap` per document while any document is unrepresented.
//!
//! Every accepted excerpt has a word-level Jaccard similarity of at most
//! `final_overlap` with every other accepted excerpt.

mod chunk;
mod refine;

pub use chunk::{paragraphs, ChunkScorer, Chunker};
pub use refine::TextRefiner;

use std::collections::{BTreeSet, HashMap};

use crate::config::ExtractOptions;
use crate::model::{Excerpt, ScoredSection};
use crate::profile::ProfileAnalysis;
use crate::text::word_jaccard;

/// Chunks taken from one section at most.
const MAX_PER_SECTION: usize = 3;

/// An excerpt candidate with its selection score.
#[derive(Debug, Clone)]
struct Candidate {
    excerpt: Excerpt,
    combined: f64,
}

/// Extracts refined excerpts from ranked sections.
#[derive(Debug, Clone)]
pub struct SubsectionExtractor {
    options: ExtractOptions,
    chunker: Chunker,
    scorer: ChunkScorer,
    refiner: TextRefiner,
}

impl SubsectionExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            chunker: Chunker::new(&options),
            scorer: ChunkScorer::new(&options),
            refiner: TextRefiner::new(options.max_excerpt_len),
            options,
        }
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// The refiner in use.
    pub fn refiner(&self) -> &TextRefiner {
        &self.refiner
    }

    /// Select up to `max_total` excerpts from the sections.
    pub fn extract(
        &self,
        sections: &[ScoredSection],
        profile: &ProfileAnalysis,
        max_total: usize,
    ) -> Vec<Excerpt> {
        if sections.is_empty() || max_total == 0 {
            return Vec::new();
        }

        let per_section = MAX_PER_SECTION.min((max_total / sections.len()).max(1));
        let mut candidates: Vec<Candidate> = sections
            .iter()
            .flat_map(|section| self.section_candidates(section, profile, per_section))
            .collect();

        candidates.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let documents: BTreeSet<&str> = sections.iter().map(|s| s.filename()).collect();
        let selected = self.select(&candidates, &documents, max_total);

        log::debug!(
            "Selected {} excerpts from {} candidates across {} documents",
            selected.len(),
            candidates.len(),
            documents.len()
        );

        selected
    }

    /// Refined excerpt candidates of one section.
    fn section_candidates(
        &self,
        section: &ScoredSection,
        profile: &ProfileAnalysis,
        limit: usize,
    ) -> Vec<Candidate> {
        let text = section.section.text.trim();
        if text.chars().count() < self.options.min_extendable_len {
            return Vec::new();
        }

        let mut scored: Vec<(String, f64)> = self
            .chunker
            .chunk(text)
            .into_iter()
            .map(|chunk| {
                let score = self.scorer.score(&chunk, profile);
                (chunk, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut accepted: Vec<(String, f64)> = Vec::new();
        for (chunk, score) in scored {
            if accepted.len() >= limit {
                break;
            }
            if score <= self.options.min_score {
                continue;
            }
            if accepted
                .iter()
                .any(|(other, _)| word_jaccard(&chunk, other) > self.options.local_overlap)
            {
                continue;
            }
            accepted.push((chunk, score));
        }

        accepted
            .into_iter()
            .filter_map(|(chunk, relevance)| {
                let refined = self.refiner.refine(&chunk);
                if refined.chars().count() < self.options.min_refined_len {
                    return None;
                }
                let combined = self.combined_score(&refined, relevance, section.importance_rank);
                Some(Candidate {
                    excerpt: Excerpt::new(section.filename(), refined, section.section.page, combined),
                    combined,
                })
            })
            .collect()
    }

    /// Relevance blended with section rank, length and specificity.
    fn combined_score(&self, refined: &str, relevance: f64, rank: u32) -> f64 {
        let words = refined.split_whitespace().count() as f64;
        let specifics = if self.scorer.has_specifics(refined) {
            0.2
        } else {
            0.0
        };
        relevance * 0.5 + (1.0 / rank.max(1) as f64) * 0.3 + (words / 100.0) * 0.1 + specifics * 0.1
    }

    fn select(
        &self,
        candidates: &[Candidate],
        documents: &BTreeSet<&str>,
        max_total: usize,
    ) -> Vec<Excerpt> {
        let mut taken = vec![false; candidates.len()];
        let mut selected: Vec<&Candidate> = Vec::new();
        let mut per_document: HashMap<&str, usize> = HashMap::new();

        // Coverage pass
        for (i, candidate) in candidates.iter().enumerate() {
            if selected.len() >= max_total {
                break;
            }
            let document = candidate.excerpt.document.as_str();
            if per_document.contains_key(document) || !self.acceptable(candidate, &selected) {
                continue;
            }
            selected.push(candidate);
            taken[i] = true;
            per_document.insert(document, 1);
        }

        // Fill pass
        for (i, candidate) in candidates.iter().enumerate() {
            if selected.len() >= max_total {
                break;
            }
            if taken[i] {
                continue;
            }
            let document = candidate.excerpt.document.as_str();
            let count = per_document.get(document).copied().unwrap_or(0);
            let all_represented = documents.iter().all(|d| per_document.contains_key(d));
            if count >= self.options.per_document_cap && !all_represented {
                continue;
            }
            if !self.acceptable(candidate, &selected) {
                continue;
            }
            selected.push(candidate);
            *per_document.entry(document).or_insert(0) += 1;
        }

        let mut excerpts: Vec<&Candidate> = selected;
        excerpts.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        excerpts.into_iter().map(|c| c.excerpt.clone()).collect()
    }

    fn acceptable(&self, candidate: &Candidate, selected: &[&Candidate]) -> bool {
        candidate.combined > self.options.min_score
            && selected.iter().all(|s| {
                word_jaccard(&candidate.excerpt.refined_text, &s.excerpt.refined_text)
                    <= self.options.final_overlap
            })
    }
}

impl Default for SubsectionExtractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, SectionScores};
    use crate::profile::ProfileAnalyzer;

    fn profile() -> ProfileAnalysis {
        ProfileAnalyzer::embedded().analyze("Travel Planner", "plan a trip for college friends")
    }

    fn scored(file: &str, heading: &str, text: &str, rank: u32) -> ScoredSection {
        ScoredSection::new(Section::new(file, heading, rank, text), SectionScores::default())
            .with_rank(rank)
    }

    const BEACHES: &str = "The beaches near Nice are ideal for a group trip. Visit the \
        Promenade des Anglais at sunset and explore the old town markets for fresh food.";
    const HOTELS: &str = "Budget hotels in Marseille offer shared rooms for 4 to 6 guests. \
        Booking early is the key: prices double during the summer festival season.";
    const NIGHTLIFE: &str = "Nightlife in Montpellier centres on Place de la Comedie. Try the \
        student bars, where a trip itinerary can include live music until 2 in the morning.";

    #[test]
    fn test_every_document_covered() {
        let sections = vec![
            scored("beaches.pdf", "Beaches", BEACHES, 1),
            scored("hotels.pdf", "Hotels", HOTELS, 2),
            scored("nightlife.pdf", "Nightlife", NIGHTLIFE, 3),
        ];
        let excerpts = SubsectionExtractor::default().extract(&sections, &profile(), 10);
        let documents: BTreeSet<&str> = excerpts.iter().map(|e| e.document.as_str()).collect();
        assert_eq!(documents.len(), 3);
    }

    #[test]
    fn test_excerpts_are_not_redundant() {
        let sections = vec![
            scored("a.pdf", "Beaches", BEACHES, 1),
            scored("b.pdf", "Beaches Again", BEACHES, 2),
            scored("c.pdf", "Hotels", HOTELS, 3),
            scored("c.pdf", "Nightlife", NIGHTLIFE, 4),
        ];
        let excerpts = SubsectionExtractor::default().extract(&sections, &profile(), 10);
        assert!(!excerpts.is_empty());
        for (i, a) in excerpts.iter().enumerate() {
            for b in &excerpts[i + 1..] {
                assert!(word_jaccard(&a.refined_text, &b.refined_text) <= 0.5);
            }
        }
        // The duplicate section is rejected
        assert_eq!(
            excerpts.iter().filter(|e| e.refined_text.contains("Promenade")).count(),
            1
        );
    }

    #[test]
    fn test_respects_max_total() {
        let sections = vec![
            scored("a.pdf", "Beaches", BEACHES, 1),
            scored("b.pdf", "Hotels", HOTELS, 2),
            scored("c.pdf", "Nightlife", NIGHTLIFE, 3),
        ];
        let excerpts = SubsectionExtractor::default().extract(&sections, &profile(), 2);
        assert_eq!(excerpts.len(), 2);
        assert!(SubsectionExtractor::default()
            .extract(&sections, &profile(), 0)
            .is_empty());
    }

    #[test]
    fn test_short_sections_yield_nothing() {
        let sections = vec![scored("a.pdf", "Tiny", "Too short.", 1)];
        assert!(SubsectionExtractor::default()
            .extract(&sections, &profile(), 5)
            .is_empty());
    }

    fn candidate(document: &str, topic: usize, combined: f64) -> Candidate {
        let text = format!("topic{0} detail{0} note{0} item{0} place{0}", topic);
        Candidate {
            excerpt: Excerpt::new(document, text, 1, combined),
            combined,
        }
    }

    #[test]
    fn test_cap_holds_while_a_document_is_unrepresented() {
        let candidates: Vec<Candidate> = (0..5)
            .map(|i| candidate("strong.pdf", i, 0.9 - i as f64 * 0.1))
            .collect();
        // quiet.pdf has sections but yields no candidates
        let documents: BTreeSet<&str> = ["strong.pdf", "quiet.pdf"].into_iter().collect();

        let selected = SubsectionExtractor::default().select(&candidates, &documents, 10);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|e| e.document == "strong.pdf"));

        let extractor =
            SubsectionExtractor::new(ExtractOptions::new().with_per_document_cap(3));
        assert_eq!(extractor.select(&candidates, &documents, 10).len(), 3);
    }

    #[test]
    fn test_cap_lifts_once_every_document_is_covered() {
        let mut candidates: Vec<Candidate> = (0..5)
            .map(|i| candidate("strong.pdf", i, 0.9 - i as f64 * 0.1))
            .collect();
        candidates.push(candidate("weak.pdf", 9, 0.2));
        let documents: BTreeSet<&str> = ["strong.pdf", "weak.pdf"].into_iter().collect();

        let selected = SubsectionExtractor::default().select(&candidates, &documents, 10);
        assert_eq!(selected.len(), 6);
    }

    #[test]
    fn test_coverage_beats_score_when_capacity_is_small() {
        let mut candidates: Vec<Candidate> = (0..5)
            .map(|i| candidate("strong.pdf", i, 0.9 - i as f64 * 0.1))
            .collect();
        candidates.push(candidate("weak.pdf", 9, 0.2));
        let documents: BTreeSet<&str> = ["strong.pdf", "weak.pdf"].into_iter().collect();

        let selected = SubsectionExtractor::default().select(&candidates, &documents, 2);
        let names: Vec<&str> = selected.iter().map(|e| e.document.as_str()).collect();
        assert_eq!(names, vec!["strong.pdf", "weak.pdf"]);
    }

    #[test]
    fn test_low_scores_dropped_with_capacity_left() {
        let candidates = vec![
            candidate("a.pdf", 0, 0.8),
            candidate("b.pdf", 1, 0.1),
            candidate("c.pdf", 2, 0.05),
            candidate("a.pdf", 3, 0.0),
        ];
        let documents: BTreeSet<&str> = ["a.pdf", "b.pdf", "c.pdf"].into_iter().collect();

        let selected = SubsectionExtractor::default().select(&candidates, &documents, 10);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].document, "a.pdf");
        assert_eq!(selected[0].score, 0.8);
    }

    #[test]
    fn test_page_number_carried() {
        let sections = vec![scored("a.pdf", "Beaches", BEACHES, 7)];
        let excerpts = SubsectionExtractor::default().extract(&sections, &profile(), 5);
        assert_eq!(excerpts[0].page_number, 7);
        assert!(excerpts[0].score > 0.1);
    }
}
