//! Entity recognizer trait.
//!
//! The `EntityRecognizer` trait abstracts over named-entity recognition.
//! Implementations:
//! - `HeuristicRecognizer`: regex rules plus an optional gazetteer file
//! - `NoopRecognizer`: finds nothing (email and custom-word matching still work)

use serde::Serialize;

/// A named entity found in text.
///
/// `start`/`end` are byte offsets into the exact input string and always fall
/// on UTF-8 character boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Trait for entity recognition backends.
///
/// Recognizers are loaded once and shared read-only across requests.
pub trait EntityRecognizer: Send + Sync {
    /// Detect entities in text, ordered by start offset.
    fn detect_entities(&self, text: &str) -> Vec<EntitySpan>;

    /// Labels this recognizer can emit.
    fn labels(&self) -> Vec<&'static str>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Recognizer that never finds anything.
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn detect_entities(&self, _text: &str) -> Vec<EntitySpan> {
        Vec::new()
    }

    fn labels(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
