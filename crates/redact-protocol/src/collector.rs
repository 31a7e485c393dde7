//! Span collection from custom words, email addresses and recognized entities.
//!
//! Collection is purely additive: spans from the three producers may overlap.
//! Overlaps are settled by [`crate::rewriter::resolve_overlaps`].

use std::collections::HashSet;
use std::sync::Arc;

use redact_core::{Error, Result};
use redact_infer::{EmailMatcher, EntityRecognizer, EMAIL_LABEL};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::span::{Span, SpanSet};

/// Case-insensitive literal matcher for a list of custom words.
///
/// Built once per call. Words are escaped and tried longest first, so the
/// longer of two words starting at the same position wins.
pub struct CustomWordMatcher {
    re: Regex,
}

impl CustomWordMatcher {
    /// Returns `Ok(None)` when no non-blank word was given.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Option<Self>> {
        let mut words: Vec<&str> = words
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| !w.trim().is_empty())
            .collect();
        if words.is_empty() {
            return Ok(None);
        }
        words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        words.dedup();

        let pattern = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Internal(format!("custom word matcher: {}", e)))?;
        Ok(Some(Self { re }))
    }

    /// Non-overlapping occurrences, left to right.
    pub fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        self.re
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }
}

/// Gathers spans from the three producers, filtered by enabled labels.
#[derive(Clone)]
pub struct SpanCollector {
    recognizer: Arc<dyn EntityRecognizer>,
    emails: EmailMatcher,
}

impl SpanCollector {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            emails: EmailMatcher::new(),
        }
    }

    pub fn recognizer(&self) -> &dyn EntityRecognizer {
        self.recognizer.as_ref()
    }

    pub fn emails(&self) -> &EmailMatcher {
        &self.emails
    }

    /// Collect spans in producer order: custom words, emails, entities.
    pub fn collect<S: AsRef<str>>(
        &self,
        text: &str,
        enabled_labels: &HashSet<String>,
        custom_words: Option<&[S]>,
    ) -> Result<SpanSet> {
        let mut spans = SpanSet::new();

        if let Some(words) = custom_words {
            if let Some(matcher) = CustomWordMatcher::new(words)? {
                spans.extend(
                    matcher
                        .find_all(text)
                        .into_iter()
                        .map(|(start, end)| Span::custom(start, end)),
                );
            }
        }

        if enabled_labels.contains(EMAIL_LABEL) {
            spans.extend(
                self.emails
                    .detect_emails(text)
                    .into_iter()
                    .map(|(start, end)| Span::email(start, end)),
            );
        }

        for entity in self.recognizer.detect_entities(text) {
            if !enabled_labels.contains(&entity.label) {
                continue;
            }
            let span = Span::entity(entity.label, entity.start, entity.end);
            if !span.fits(text) {
                warn!(
                    "Recognizer {} returned out-of-range span {}..{} ({})",
                    self.recognizer.name(),
                    span.start,
                    span.end,
                    span.label
                );
                continue;
            }
            spans.push(span);
        }

        debug!("Collected {} spans", spans.len());
        Ok(spans)
    }
}
