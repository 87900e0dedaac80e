//! Keyword and pattern tables loaded as data.
//!
//! Every table can be replaced from a JSON file without recompiling. The
//! embedded defaults are used for any table that is not overridden.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Named keyword lists (domain → indicators, pattern → keywords).
///
/// Entries keep the order in which they were defined or read, so ties
/// between entries resolve the same way as in the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTable {
    entries: Vec<(String, Vec<String>)>,
}

impl KeywordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keywords of an entry.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, keywords)| keywords.as_slice())
    }

    /// Whether an entry exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an entry's keywords. A new name is appended, an existing one
    /// keeps its position.
    pub fn insert(&mut self, name: String, keywords: Vec<String>) {
        *self.keywords_mut(name) = keywords;
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    /// Keyword lists in table order.
    pub fn values(&self) -> impl Iterator<Item = &[String]> {
        self.entries.iter().map(|(_, keywords)| keywords.as_slice())
    }

    fn keywords_mut(&mut self, name: String) -> &mut Vec<String> {
        let index = match self.entries.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                self.entries.push((name, Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

impl Index<&str> for KeywordTable {
    type Output = [String];

    fn index(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(keywords) => keywords,
            None => panic!("no keyword table entry named {name:?}"),
        }
    }
}

impl FromIterator<(String, Vec<String>)> for KeywordTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, keywords) in iter {
            table.insert(name, keywords);
        }
        table
    }
}

impl IntoIterator for KeywordTable {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for KeywordTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, keywords)| (name, keywords)))
    }
}

impl<'de> Deserialize<'de> for KeywordTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(KeywordTableVisitor)
    }
}

struct KeywordTableVisitor;

impl<'de> Visitor<'de> for KeywordTableVisitor {
    type Value = KeywordTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of keyword lists")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<KeywordTable, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut table = KeywordTable::new();
        while let Some((name, keywords)) = map.next_entry::<String, Vec<String>>()? {
            table.insert(name, keywords);
        }
        Ok(table)
    }
}

/// Named exclusion regexes (category → pattern).
pub type ExclusionPatterns = BTreeMap<String, String>;

/// Tables consumed by the profile analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Tokens dropped during keyword extraction
    pub stop_words: BTreeSet<String>,
    /// Domain → indicator keywords
    pub domains: KeywordTable,
    /// Task pattern category → keywords (each keyword is also a trigger)
    pub task_patterns: KeywordTable,
}

impl ProfileConfig {
    /// Built-in tables.
    pub fn embedded() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            domains: table(DEFAULT_DOMAINS),
            task_patterns: table(DEFAULT_TASK_PATTERNS),
        }
    }

    /// Add keywords to a domain, creating it if needed.
    pub fn extend_domain(&mut self, domain: &str, keywords: &[&str]) {
        extend(&mut self.domains, domain, keywords);
    }

    /// Add keywords to a task pattern, creating it if needed.
    pub fn extend_task_pattern(&mut self, pattern: &str, keywords: &[&str]) {
        extend(&mut self.task_patterns, pattern, keywords);
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Complete configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Profile analyzer tables
    pub profile: ProfileConfig,
    /// Heading exclusion classifier patterns
    pub exclusion_patterns: ExclusionPatterns,
}

/// On-disk combined config; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    stop_words: Option<Vec<String>>,
    #[serde(default)]
    domains: Option<KeywordTable>,
    #[serde(default)]
    task_patterns: Option<KeywordTable>,
    #[serde(default)]
    exclusion_patterns: Option<ExclusionPatterns>,
}

impl RankConfig {
    /// Built-in configuration.
    pub fn embedded() -> Self {
        Self {
            profile: ProfileConfig::embedded(),
            exclusion_patterns: default_exclusion_patterns(),
        }
    }

    /// Load a combined config file over the embedded defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse a combined config over the embedded defaults.
    pub fn from_json(data: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(data)?;
        let mut config = Self::embedded();
        if let Some(stop_words) = file.stop_words {
            config.profile.stop_words = normalize_words(stop_words);
        }
        if let Some(domains) = file.domains {
            config.profile.domains = normalize_table(domains)?;
        }
        if let Some(patterns) = file.task_patterns {
            config.profile.task_patterns = normalize_table(patterns)?;
        }
        if let Some(exclusions) = file.exclusion_patterns {
            config.exclusion_patterns = exclusions;
        }
        log::debug!(
            "Loaded config: {} stop words, {} domains, {} task patterns",
            config.profile.stop_words.len(),
            config.profile.domains.len(),
            config.profile.task_patterns.len()
        );
        Ok(config)
    }

    /// Replace the stop-word list from a JSON array file.
    pub fn with_stop_words_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let words: Vec<String> = read_json(path)?;
        self.profile.stop_words = normalize_words(words);
        Ok(self)
    }

    /// Replace the domain table from a JSON object file.
    pub fn with_domains_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.profile.domains = normalize_table(read_json(path)?)?;
        Ok(self)
    }

    /// Replace the task-pattern table from a JSON object file.
    pub fn with_task_patterns_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.profile.task_patterns = normalize_table(read_json(path)?)?;
        Ok(self)
    }

    /// Replace the exclusion patterns from a JSON object file.
    pub fn with_exclusions_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.exclusion_patterns = read_json(path)?;
        Ok(self)
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

fn read_json<T: serde::de::DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn normalize_words(words: Vec<String>) -> BTreeSet<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn normalize_table(table: KeywordTable) -> Result<KeywordTable> {
    let mut normalized = KeywordTable::new();
    for (name, keywords) in table {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::Config("empty table key".into()));
        }
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        normalized.insert(name, keywords);
    }
    Ok(normalized)
}

fn extend(table: &mut KeywordTable, name: &str, keywords: &[&str]) {
    let entry = table.keywords_mut(name.trim().to_lowercase());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !entry.contains(&keyword) {
            entry.push(keyword);
        }
    }
}

fn table(entries: &[(&str, &[&str])]) -> KeywordTable {
    entries
        .iter()
        .map(|(name, words)| {
            (
                name.to_string(),
                words.iter().map(|w| w.to_string()).collect(),
            )
        })
        .collect()
}

/// Built-in heading exclusion categories.
pub fn default_exclusion_patterns() -> ExclusionPatterns {
    [
        (
            "DISCLAIMER_KEYWORDS",
            r"disclaimer|terms and conditions|privacy policy|all rights reserved",
        ),
        (
            "ADDRESS_KEYWORDS",
            r"address|suite|road|street|avenue|parkway|boulevard|drive",
        ),
        (
            "INSTRUCTIONAL_KEYWORDS",
            r"instructions|please read carefully|guidelines|rsvp",
        ),
        ("WEBSITE_PATTERNS", r"(https?://[^\s]+|www\.[^\s]+)"),
        (
            "FOOTER_KEYWORDS",
            r"page \d+|copyright|©|\d{4} all rights reserved",
        ),
        ("HEADER_KEYWORDS", r"confidential|draft|internal use only"),
        ("FORM_FIELDS", r"name:|date:|signature:|please fill"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one", "our",
    "had", "day", "get", "has", "him", "how", "man", "new", "now", "old", "see", "two", "way",
    "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "this", "that", "with",
    "have", "they", "will", "been", "from", "would", "there", "their", "what", "about", "which",
    "when", "make", "like", "into", "time", "very", "after", "first", "well", "much", "also",
    "many", "such", "only", "some", "other", "then", "them", "these", "come", "could", "want",
    "look", "over", "think", "where", "just", "work", "life", "even", "back", "any", "good",
    "woman", "through", "down", "may", "call",
];

const DEFAULT_DOMAINS: &[(&str, &[&str])] = &[
    (
        "travel",
        &[
            "travel", "trip", "hotel", "restaurant", "destination", "vacation", "tourism",
            "itinerary", "booking", "sightseeing", "attraction", "guide", "culture",
        ],
    ),
    (
        "academic",
        &[
            "research", "study", "academic", "literature", "analysis", "methodology", "thesis",
            "dissertation", "scholarly", "education", "learning", "knowledge",
        ],
    ),
    (
        "business",
        &[
            "business", "financial", "market", "revenue", "strategy", "profit", "investment",
            "performance", "competitive", "portfolio", "operations",
        ],
    ),
    (
        "technical",
        &[
            "technology", "software", "development", "data", "system", "programming",
            "engineering", "algorithm", "analytics", "innovation",
        ],
    ),
    (
        "healthcare",
        &[
            "medical", "health", "patient", "clinical", "treatment", "diagnosis", "therapy",
            "healthcare", "wellness", "care",
        ],
    ),
    (
        "legal",
        &[
            "legal", "law", "regulation", "compliance", "contract", "litigation", "rights",
            "jurisdiction",
        ],
    ),
];

const DEFAULT_TASK_PATTERNS: &[(&str, &[&str])] = &[
    (
        "planning",
        &[
            "plan", "organize", "prepare", "schedule", "arrange", "coordinate", "strategy",
            "timeline",
        ],
    ),
    (
        "analysis",
        &[
            "analyze", "review", "evaluate", "assess", "examine", "investigate", "study",
            "compare",
        ],
    ),
    (
        "research",
        &[
            "research", "investigate", "study", "explore", "discover", "find", "identify",
        ],
    ),
    (
        "creation",
        &[
            "create", "develop", "build", "design", "generate", "produce", "establish",
        ],
    ),
    (
        "evaluation",
        &["evaluate", "assess", "judge", "measure", "benchmark", "appraise"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_tables() {
        let config = RankConfig::embedded();
        assert!(config.profile.domains.contains_key("legal"));
        assert!(config.profile.task_patterns["research"].contains(&"identify".to_string()));
        assert!(config.profile.stop_words.contains("the"));
        assert_eq!(config.exclusion_patterns.len(), 7);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = RankConfig::from_json(r#"{"stop_words": ["Foo", " bar "]}"#).unwrap();
        assert_eq!(config.profile.stop_words.len(), 2);
        assert!(config.profile.stop_words.contains("foo"));
        assert!(config.profile.stop_words.contains("bar"));
        assert!(config.profile.domains.contains_key("travel"));
    }

    #[test]
    fn test_domains_file_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Cooking": ["Recipe", "menu"]}}"#).unwrap();

        let config = RankConfig::embedded()
            .with_domains_file(file.path())
            .unwrap();
        assert_eq!(config.profile.domains.len(), 1);
        assert_eq!(
            config.profile.domains.get("cooking"),
            Some(&["recipe".to_string(), "menu".to_string()][..])
        );
    }

    #[test]
    fn test_table_order_is_kept() {
        let embedded = RankConfig::embedded();
        let names: Vec<&str> = embedded.profile.domains.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["travel", "academic", "business", "technical", "healthcare", "legal"]
        );

        let config = RankConfig::from_json(
            r#"{"task_patterns": {"Zeta": ["z"], "alpha": ["a"], "Mid": ["m"]}}"#,
        )
        .unwrap();
        let names: Vec<&str> = config
            .profile
            .task_patterns
            .iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let json = serde_json::to_string(&config.profile.task_patterns).unwrap();
        assert_eq!(json, r#"{"zeta":["z"],"alpha":["a"],"mid":["m"]}"#);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            RankConfig::from_json("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_extend_domain() {
        let mut profile = ProfileConfig::embedded();
        profile.extend_domain("legal", &["Statute", "law"]);
        profile.extend_domain("maritime", &["vessel"]);
        let legal = &profile.domains["legal"];
        assert!(legal.contains(&"statute".to_string()));
        assert_eq!(legal.iter().filter(|k| *k == "law").count(), 1);
        assert_eq!(profile.domains.get("maritime"), Some(&["vessel".to_string()][..]));
        assert_eq!(profile.domains.iter().last().map(|(name, _)| name), Some("maritime"));
    }
}
