//! Pairing detected headings with the text that follows them.
//!
//! Layout data is often partial, so every step has a fallback:
//!
//! 1. Lines after the heading line, across page breaks, until the next
//!    heading or the character cap.
//! 2. When that yields fewer than [`SHORT_SECTION_CHARS`], lines after the
//!    first loose match of the heading on its page.
//! 3. When the heading cannot be found at all, the first
//!    [`PAGE_FALLBACK_WORDS`] words of the page.
//!
//! Documents without any heading get one section per non-empty page.

use std::collections::HashSet;

use crate::model::{DocumentRecord, Excerpt, HeadingCandidate, Section};
use crate::text::looks_like_heading;

/// Section text shorter than this triggers the page fallback.
pub const SHORT_SECTION_CHARS: usize = 100;

/// Words taken from a page when the heading cannot be located.
pub const PAGE_FALLBACK_WORDS: usize = 200;

/// Leading words that disqualify a line as a page title.
const FUNCTION_WORDS: &[&str] = &["the", "this", "that", "it", "in", "on", "at"];

/// Builds sections from loaded document records.
#[derive(Debug, Clone, Copy)]
pub struct SectionBuilder {
    char_cap: usize,
}

impl SectionBuilder {
    /// Create a builder that caps section text at `char_cap` characters.
    pub fn new(char_cap: usize) -> Self {
        Self {
            char_cap: char_cap.max(1),
        }
    }

    /// Sections of one document, in document order.
    ///
    /// Failed documents have no sections.
    pub fn build(&self, record: &DocumentRecord) -> Vec<Section> {
        if !record.is_ok() {
            return Vec::new();
        }
        if record.headings.is_empty() {
            return self.page_sections(record);
        }

        let known: HashSet<String> = record
            .headings
            .iter()
            .map(|h| h.text.trim().to_lowercase())
            .collect();

        record
            .headings
            .iter()
            .map(|heading| {
                Section::new(
                    record.filename.as_str(),
                    heading.text.as_str(),
                    heading.page,
                    self.section_text(record, heading, &known),
                )
                .with_level(heading.level)
                .with_font(heading.font_size, heading.is_bold)
            })
            .collect()
    }

    /// Text belonging to a heading, with the page fallbacks applied.
    fn section_text(
        &self,
        record: &DocumentRecord,
        heading: &HeadingCandidate,
        known: &HashSet<String>,
    ) -> String {
        let text = self.following_text(record, heading, known);
        if text.chars().count() >= SHORT_SECTION_CHARS {
            return text;
        }

        let fallback = content_from_page(record.page_text(heading.page), &heading.text, self.char_cap);
        if fallback.chars().count() > text.chars().count() {
            fallback
        } else {
            text
        }
    }

    /// Lines after the heading line, keeping blank-line paragraph breaks.
    fn following_text(
        &self,
        record: &DocumentRecord,
        heading: &HeadingCandidate,
        known: &HashSet<String>,
    ) -> String {
        let target = heading.text.trim().to_lowercase();
        if target.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        let mut len = 0;
        let mut found = false;

        'pages: for (_, page) in record.page_texts.range(heading.page..) {
            let mut lines = page.lines();
            if !found {
                // The heading must be on its own page
                if !lines.any(|line| line.to_lowercase().contains(&target)) {
                    return String::new();
                }
                found = true;
            } else {
                push_break(&mut out);
            }

            for line in lines {
                let line = line.trim();
                if line.is_empty() {
                    push_break(&mut out);
                    continue;
                }
                if known.contains(&line.to_lowercase()) || looks_like_heading(line) {
                    break 'pages;
                }
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(line);
                len += line.chars().count() + 1;
                if len >= self.char_cap {
                    break 'pages;
                }
            }
        }

        truncate_chars(out.trim(), self.char_cap)
    }

    /// One synthetic section per non-empty page.
    fn page_sections(&self, record: &DocumentRecord) -> Vec<Section> {
        record
            .page_texts
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(&page, text)| {
                let title = page_title(text, &record.filename, page);
                Section::new(
                    record.filename.as_str(),
                    title,
                    page,
                    truncate_chars(text.trim(), self.char_cap),
                )
            })
            .collect()
    }
}

impl Default for SectionBuilder {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Content after a loose match of `heading` on a page.
///
/// A line matches when it contains the heading or is contained in it.
/// Collection stops at the next heading-like line or once the text exceeds
/// `char_cap`. Without a match the first [`PAGE_FALLBACK_WORDS`] words of
/// the page are returned.
pub fn content_from_page(page_text: &str, heading: &str, char_cap: usize) -> String {
    let heading = heading.trim().to_lowercase();
    if page_text.trim().is_empty() || heading.is_empty() {
        return String::new();
    }

    let mut collected: Vec<&str> = Vec::new();
    let mut len = 0;
    let mut found = false;

    for line in page_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        if lower.contains(&heading) || heading.contains(&lower) {
            found = true;
            continue;
        }
        if !found {
            continue;
        }
        if looks_like_heading(line) {
            break;
        }
        len += line.chars().count() + usize::from(!collected.is_empty());
        collected.push(line);
        if len > char_cap {
            break;
        }
    }

    if collected.is_empty() {
        return page_text
            .split_whitespace()
            .take(PAGE_FALLBACK_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
    }
    collected.join(" ")
}

/// Title for a page that has no detected heading.
///
/// The first line of 10 to 80 characters with at least two words that is
/// not a bare number and does not open with a function word, else
/// `"Content from {filename} - Page {page}"`.
pub fn page_title(page_text: &str, filename: &str, page: u32) -> String {
    page_text
        .lines()
        .map(str::trim)
        .find(|line| is_title_line(line))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Content from {} - Page {}", filename, page))
}

fn is_title_line(line: &str) -> bool {
    let len = line.chars().count();
    if !(10..=80).contains(&len) || line.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };
    if words.next().is_none() {
        return false;
    }
    !FUNCTION_WORDS.contains(&first.to_lowercase().as_str())
}

/// Stand-in excerpt for a document that produced none.
///
/// Uses the refined section text when it is usable, otherwise a sentence
/// naming the section and its document.
pub fn fallback_excerpt(section: &Section, refined: &str, score: f64) -> Excerpt {
    let text = if refined.trim().chars().count() >= 20 {
        refined.trim().to_string()
    } else {
        format!(
            "{}: content from {}, page {}.",
            section.heading.trim().trim_end_matches(['.', ':']),
            section.filename,
            section.page
        )
    };
    Excerpt::new(section.filename.as_str(), text, section.page, score)
}

fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((i, _)) => text[..i].to_string(),
        None => text.to_string(),
    }
}
