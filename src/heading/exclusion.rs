//! Exclusion classifier for heading candidates.
//!
//! Named, case-insensitive pattern categories (loaded from configuration)
//! plus a fixed set of structural rules for addresses, phone numbers and
//! all-caps labels.

use regex::{Regex, RegexBuilder};

use crate::config::{default_exclusion_patterns, ExclusionPatterns};
use crate::error::Result;
use crate::text::is_all_upper;

/// Decides whether a line of text is boilerplate rather than a heading.
#[derive(Debug, Clone)]
pub struct ExclusionClassifier {
    categories: Vec<(String, Regex)>,
    street_address: Regex,
    phone_number: Regex,
    bare_number: Regex,
}

impl ExclusionClassifier {
    /// Compile a classifier from named patterns.
    pub fn new(patterns: &ExclusionPatterns) -> Result<Self> {
        let mut categories = Vec::with_capacity(patterns.len());
        for (name, pattern) in patterns {
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            categories.push((name.clone(), regex));
        }

        Ok(Self {
            categories,
            street_address: Regex::new(r"^\d+\s+[A-Z]+")?,
            phone_number: Regex::new(r"^[\d\-\(\)\+ ]+$")?,
            bare_number: Regex::new(r"^[\d\s\-/.,]+$")?,
        })
    }

    /// Classifier with the built-in categories.
    pub fn embedded() -> Result<Self> {
        Self::new(&default_exclusion_patterns())
    }

    /// Names of every category whose pattern occurs in the text.
    pub fn classify(&self, text: &str) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Whether the text should never be treated as a heading.
    pub fn is_excluded(&self, text: &str) -> bool {
        let text = text.trim();

        if self.categories.iter().any(|(_, regex)| regex.is_match(text)) {
            return true;
        }

        if text.starts_with("RSVP") {
            return true;
        }

        if self.street_address.is_match(text)
            || self.phone_number.is_match(text)
            || self.bare_number.is_match(text)
        {
            return true;
        }

        if is_all_upper(text) {
            // Shouting sentences and short labels like "FAX" or "EMAIL"
            if text.split_whitespace().count() > 3 || text.chars().count() <= 6 {
                return true;
            }
        }

        false
    }
}
