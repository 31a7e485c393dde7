//! Rule-based entity recognition: date/time/money patterns, organization
//! suffixes, a place gazetteer and capitalized-name sequences.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use redact_core::{Error, Result};
use regex::Regex;
use tracing::info;

use crate::recognizer::{EntityRecognizer, EntitySpan};

pub const PERSON: &str = "PERSON";
pub const ORG: &str = "ORG";
pub const GPE: &str = "GPE";
pub const DATE: &str = "DATE";
pub const TIME: &str = "TIME";
pub const MONEY: &str = "MONEY";

/// Labels in the order rules are applied. Earlier labels win overlaps.
const RULE_ORDER: &[&str] = &[DATE, TIME, MONEY, ORG, GPE, PERSON];

static DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b\d{1,2}(?:st|nd|rd|th)?\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b",
        r"\b\d{4}-\d{1,2}-\d{1,2}\b",
        r"\b(?:yesterday|today|tomorrow)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}:\d{2}\s*(?:AM|PM|am|pm)?\b|\b\d{1,2}\s*(?:AM|PM|am|pm)\b").unwrap());

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d[\d,]*(?:\.\d{2})?(?:\s*(?:million|billion))?").unwrap());

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z&]*\s+)*[A-Z][A-Za-z&]*\s+(?:Inc|Corp|Corporation|LLC|Ltd|Co|Company|Group|University|Bank)\b",
    )
    .unwrap()
});

static TITLED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").unwrap()
});

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2}\b").unwrap());

const BUILTIN_PLACES: &[&str] = &[
    "London", "Paris", "Berlin", "Madrid", "Rome", "Tokyo", "Beijing", "Delhi", "Mumbai",
    "New York", "Los Angeles", "Chicago", "Boston", "San Francisco", "Seattle", "Toronto",
    "Sydney", "Nairobi", "Lagos", "Cairo", "Moscow", "Dublin", "Amsterdam", "Singapore",
    "America", "United States", "USA", "UK", "United Kingdom", "England", "France", "Germany",
    "Spain", "Italy", "Japan", "China", "India", "Canada", "Australia", "Brazil", "Mexico",
    "Kenya", "Nigeria", "Egypt", "Russia", "Ireland", "California", "Texas", "Florida",
];

/// Capitalized words that start a name-like sequence but are not names.
const NON_NAME_WORDS: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "Those", "In", "On", "At", "For", "From", "To",
    "And", "But", "Or", "If", "When", "Dear", "Hello", "Hi", "Thanks", "Please", "Monday",
    "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January", "February",
    "March", "April", "May", "June", "July", "August", "September", "October", "November",
    "December",
];

/// Rule-based recognizer.
///
/// Gazetteer entries (built-in places plus any loaded from a JSON file) are
/// matched as whole words, case-sensitively.
pub struct HeuristicRecognizer {
    gazetteer: Vec<(String, Regex)>,
}

impl HeuristicRecognizer {
    /// Recognizer with the built-in place list only.
    pub fn new() -> Self {
        let mut terms: HashMap<String, Vec<String>> = HashMap::new();
        terms.insert(
            GPE.to_string(),
            BUILTIN_PLACES.iter().map(|s| s.to_string()).collect(),
        );
        // Built-in terms are escaped, so compilation cannot fail.
        Self::with_terms(terms).unwrap_or(Self { gazetteer: Vec::new() })
    }

    /// Recognizer with extra gazetteer terms loaded from a JSON file shaped
    /// like `{"GPE": ["Springfield"], "ORG": ["Initech"]}`.
    pub fn from_gazetteer(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let extra: HashMap<String, Vec<String>> = serde_json::from_str(&data)
            .map_err(|e| Error::Recognizer(format!("invalid gazetteer {}: {}", path.display(), e)))?;

        let mut terms: HashMap<String, Vec<String>> = HashMap::new();
        terms.insert(
            GPE.to_string(),
            BUILTIN_PLACES.iter().map(|s| s.to_string()).collect(),
        );
        for (label, words) in extra {
            let label = label.to_uppercase();
            if !RULE_ORDER.contains(&label.as_str()) {
                return Err(Error::Recognizer(format!(
                    "unsupported gazetteer label: {}",
                    label
                )));
            }
            terms.entry(label).or_default().extend(words);
        }

        let recognizer = Self::with_terms(terms)?;
        info!(
            "Loaded gazetteer from {} ({} labels)",
            path.display(),
            recognizer.gazetteer.len()
        );
        Ok(recognizer)
    }

    fn with_terms(terms: HashMap<String, Vec<String>>) -> Result<Self> {
        let mut gazetteer = Vec::new();
        for label in RULE_ORDER {
            let Some(words) = terms.get(*label) else {
                continue;
            };
            let mut words: Vec<&str> = words
                .iter()
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .collect();
            if words.is_empty() {
                continue;
            }
            // Longest first so "New York" wins over "York".
            words.sort_by(|a, b| b.len().cmp(&a.len()));
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&format!(r"\b(?:{})\b", alternation))
                .map_err(|e| Error::Recognizer(e.to_string()))?;
            gazetteer.push((label.to_string(), re));
        }
        Ok(Self { gazetteer })
    }

    fn rule_matches(&self, label: &str, text: &str) -> Vec<(usize, usize)> {
        let mut found: Vec<(usize, usize)> = Vec::new();

        for (gaz_label, re) in &self.gazetteer {
            if gaz_label == label {
                found.extend(re.find_iter(text).map(|m| (m.start(), m.end())));
            }
        }

        match label {
            DATE => {
                for re in DATE_RES.iter() {
                    found.extend(re.find_iter(text).map(|m| (m.start(), m.end())));
                }
            }
            TIME => found.extend(TIME_RE.find_iter(text).map(|m| (m.start(), m.end()))),
            MONEY => found.extend(MONEY_RE.find_iter(text).map(|m| (m.start(), m.end()))),
            ORG => found.extend(ORG_RE.find_iter(text).map(|m| (m.start(), m.end()))),
            PERSON => {
                for cap in TITLED_NAME_RE.captures_iter(text) {
                    if let Some(m) = cap.get(1) {
                        found.push((m.start(), m.end()));
                    }
                }
                for m in NAME_RE.find_iter(text) {
                    if looks_like_name(m.as_str()) {
                        found.push((m.start(), m.end()));
                    }
                }
            }
            _ => {}
        }

        found
    }
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_name(candidate: &str) -> bool {
    !candidate
        .split_whitespace()
        .any(|w| NON_NAME_WORDS.contains(&w) || BUILTIN_PLACES.contains(&w))
}

impl EntityRecognizer for HeuristicRecognizer {
    fn detect_entities(&self, text: &str) -> Vec<EntitySpan> {
        let mut accepted: Vec<EntitySpan> = Vec::new();

        for label in RULE_ORDER {
            let mut matches = self.rule_matches(label, text);
            // Longest match first at equal starts.
            matches.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
            for (start, end) in matches {
                if start >= end || accepted.iter().any(|e| e.overlaps(start, end)) {
                    continue;
                }
                accepted.push(EntitySpan::new(*label, start, end));
            }
        }

        accepted.sort_by_key(|e| e.start);
        accepted
    }

    fn labels(&self) -> Vec<&'static str> {
        RULE_ORDER.to_vec()
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
