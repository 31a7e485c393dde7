//! Spans of sensitive text and the audit trail of applied replacements.

use serde::Serialize;

pub const CUSTOM_LABEL: &str = "CUSTOM";

/// Which producer emitted a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Custom,
    Email,
    Entity,
}

impl SpanKind {
    /// Overlap priority: lower wins.
    pub fn priority(self) -> u8 {
        match self {
            SpanKind::Custom => 0,
            SpanKind::Email => 1,
            SpanKind::Entity => 2,
        }
    }
}

/// A half-open byte range `[start, end)` of the original text plus its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub kind: SpanKind,
}

impl Span {
    pub fn custom(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            label: CUSTOM_LABEL.to_string(),
            kind: SpanKind::Custom,
        }
    }

    pub fn email(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            label: redact_infer::EMAIL_LABEL.to_string(),
            kind: SpanKind::Email,
        }
    }

    pub fn entity(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            kind: SpanKind::Entity,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `0 <= start < end <= text.len()`, with both ends on char boundaries.
    pub fn fits(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// Spans in collection order; may overlap.
pub type SpanSet = Vec<Span>;

/// One applied replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
    pub label: String,
}

/// Applied replacements in application order (rightmost first).
pub type AuditRecord = Vec<AuditEntry>;
