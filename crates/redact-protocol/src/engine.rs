//! Protection service: request validation and the collect → resolve →
//! rewrite pipeline for each protection method.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use redact_core::{Error, Result};
use redact_infer::{EntityRecognizer, EMAIL_LABEL};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::collector::SpanCollector;
use crate::policy::{Policy, RedactionLevel};
use crate::rewriter::{apply_policy, resolve_overlaps};
use crate::span::AuditRecord;
use crate::stats::{count_entities, EntityCounts};

/// Text the input box shows before the user types anything.
pub const PLACEHOLDER_TEXT: &str = "Type Here";

pub const MISSING_TEXT_MESSAGE: &str = "Please enter some text to protect or upload a file.";
pub const MISSING_TARGETS_MESSAGE: &str =
    "Please select at least one entity type to protect or enter custom words.";
pub const MISSING_ANALYSIS_TEXT_MESSAGE: &str = "Please enter some text to analyze.";

/// Protection method chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionMethod {
    #[serde(alias = "Data Redaction")]
    Redaction,
    #[serde(alias = "Data Masking")]
    Masking,
    #[serde(alias = "Data Anonymization")]
    Anonymization,
}

impl ProtectionMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProtectionMethod::Redaction => "Data Redaction",
            ProtectionMethod::Masking => "Data Masking",
            ProtectionMethod::Anonymization => "Data Anonymization",
        }
    }

    /// Prefix for generated output files, e.g. `data_redaction`.
    pub fn file_prefix(&self) -> String {
        self.display_name().to_lowercase().replace(' ', "_")
    }

    pub fn policy(&self, level: RedactionLevel) -> Policy {
        match self {
            ProtectionMethod::Redaction => Policy::Redact(level),
            ProtectionMethod::Masking => Policy::Mask,
            ProtectionMethod::Anonymization => Policy::Anonymize,
        }
    }

    /// Output filename for a result produced at `now`.
    pub fn output_filename<Tz: chrono::TimeZone>(&self, now: &chrono::DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!("{}_{}.txt", self.file_prefix(), now.format("%Y%m%d_%H%M%S"))
    }
}

impl fmt::Display for ProtectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A request to protect a piece of text.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionRequest {
    pub text: String,
    #[serde(default, rename = "entityTypes")]
    pub entity_types: Vec<String>,
    #[serde(default, rename = "customWords")]
    pub custom_words: Vec<String>,
    pub method: ProtectionMethod,
    #[serde(default, rename = "redactionLevel")]
    pub redaction_level: RedactionLevel,
}

impl ProtectionRequest {
    pub fn new(text: impl Into<String>, method: ProtectionMethod) -> Self {
        Self {
            text: text.into(),
            entity_types: Vec::new(),
            custom_words: Vec::new(),
            method,
            redaction_level: RedactionLevel::default(),
        }
    }

    pub fn with_entity_types<S: AsRef<str>>(mut self, types: &[S]) -> Self {
        self.entity_types = types.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn with_custom_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.custom_words = words.iter().map(|w| w.as_ref().to_string()).collect();
        self
    }

    pub fn with_redaction_level(mut self, level: RedactionLevel) -> Self {
        self.redaction_level = level;
        self
    }
}

/// Split a comma-separated custom word list, trimming items and dropping blanks.
pub fn parse_custom_words(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// File types accepted as input text.
pub const UPLOAD_EXTENSIONS: &[&str] = &["txt", "csv"];

/// Decode an uploaded `.txt` or `.csv` file as UTF-8 text.
pub fn read_upload(filename: &str, bytes: &[u8]) -> Result<String> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::Validation(format!(
            "Unsupported file type: {}. Upload a .txt or .csv file.",
            filename
        )));
    }

    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::Validation(format!("{} is not valid UTF-8 text.", filename)))
}

/// Result of a protection run.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectionOutcome {
    pub text: String,
    pub method: ProtectionMethod,
    /// Applied replacements, rightmost first.
    pub audit: AuditRecord,
    /// Number of spans replaced.
    pub applied: usize,
    /// Number of collected spans discarded by overlap resolution.
    pub dropped: usize,
}

fn validate_text(text: &str, message: &str) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_TEXT {
        return Err(Error::Validation(message.to_string()));
    }
    Ok(())
}

/// Runs protection and analysis against a shared recognizer.
#[derive(Clone)]
pub struct ProtectionService {
    collector: SpanCollector,
}

impl ProtectionService {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            collector: SpanCollector::new(recognizer),
        }
    }

    pub fn collector(&self) -> &SpanCollector {
        &self.collector
    }

    /// Recognizer labels plus `EMAIL`.
    pub fn available_entity_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .collector
            .recognizer()
            .labels()
            .into_iter()
            .map(String::from)
            .collect();
        if !types.iter().any(|t| t == EMAIL_LABEL) {
            types.push(EMAIL_LABEL.to_string());
        }
        types
    }

    /// Validate `request` and rewrite its text with the chosen method.
    pub fn protect(&self, request: &ProtectionRequest) -> Result<ProtectionOutcome> {
        validate_text(&request.text, MISSING_TEXT_MESSAGE)?;

        let custom_words: Vec<&str> = request
            .custom_words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect();
        let enabled: HashSet<String> = request
            .entity_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
            .collect();
        if enabled.is_empty() && custom_words.is_empty() {
            return Err(Error::Validation(MISSING_TARGETS_MESSAGE.to_string()));
        }

        let spans = self
            .collector
            .collect(&request.text, &enabled, Some(custom_words.as_slice()))?;
        let collected = spans.len();
        let (kept, overlapping) = resolve_overlaps(spans);

        let policy = request.method.policy(request.redaction_level);
        let rewrite = apply_policy(&request.text, &kept, policy);

        info!(
            "{}: {} spans collected, {} applied, {} dropped",
            request.method,
            collected,
            rewrite.audit.len(),
            overlapping.len() + rewrite.dropped.len()
        );

        Ok(ProtectionOutcome {
            applied: rewrite.audit.len(),
            dropped: overlapping.len() + rewrite.dropped.len(),
            text: rewrite.text,
            method: request.method,
            audit: rewrite.audit,
        })
    }

    /// Validate `text` and count its entities by label.
    pub fn analyze(&self, text: &str) -> Result<EntityCounts> {
        validate_text(text, MISSING_ANALYSIS_TEXT_MESSAGE)?;
        Ok(count_entities(&self.collector, text))
    }
}
