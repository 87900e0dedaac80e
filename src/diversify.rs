//! Cross-document diversification of ranked sections.

use std::collections::HashSet;

use crate::model::ScoredSection;

/// Select sections so that every document is represented before any
/// document contributes a second section.
///
/// The first pass takes the best section of each document in rank order.
/// The second pass fills the remaining capacity down the ranked list. With
/// `max_count` of at least the number of documents, every document that has
/// a ranked section appears in the output.
pub fn diversify(ranked: &[ScoredSection], max_count: Option<usize>) -> Vec<ScoredSection> {
    let capacity = max_count.unwrap_or(ranked.len());
    let mut selected = Vec::new();
    let mut taken = vec![false; ranked.len()];
    let mut documents: HashSet<&str> = HashSet::new();

    for (i, section) in ranked.iter().enumerate() {
        if selected.len() >= capacity {
            break;
        }
        if documents.insert(section.filename()) {
            selected.push(i);
            taken[i] = true;
        }
    }

    for (i, is_taken) in taken.iter().enumerate() {
        if selected.len() >= capacity {
            break;
        }
        if !is_taken {
            selected.push(i);
        }
    }

    log::debug!(
        "Diversified {} ranked sections into {} from {} documents",
        ranked.len(),
        selected.len(),
        documents.len()
    );

    selected.into_iter().map(|i| ranked[i].clone()).collect()
}
