//! Conflict resolution and right-to-left rewriting.
//!
//! Replacements are spliced into a single buffer in descending `end` order.
//! Splicing only shifts text to the right of an edit, so once every span
//! still to be applied lies left of every applied span, the original offsets
//! stay valid. [`apply`] enforces that by skipping any span that intersects
//! one already applied.

use std::collections::BTreeMap;

use tracing::debug;

use crate::policy::Policy;
use crate::span::{AuditEntry, AuditRecord, Span};

/// Result of rewriting a text.
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub text: String,
    /// Applied replacements, rightmost first.
    pub audit: AuditRecord,
    /// Spans skipped because they were malformed or intersected an applied span.
    pub dropped: Vec<Span>,
}

/// Split `spans` into a non-overlapping set to keep and the rest.
///
/// Priority is `CUSTOM > EMAIL > entity`. Within one priority the earlier
/// start wins, then the longer span. Kept spans come back in their original
/// collection order.
pub fn resolve_overlaps(spans: Vec<Span>) -> (Vec<Span>, Vec<Span>) {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (&spans[a], &spans[b]);
        sa.kind
            .priority()
            .cmp(&sb.kind.priority())
            .then(sa.start.cmp(&sb.start))
            .then(sb.end.cmp(&sa.end))
    });

    let mut keep = vec![false; spans.len()];
    // Accepted intervals, start -> end. They never intersect, so only the
    // accepted span starting last before `span.end` can overlap `span`.
    let mut accepted: BTreeMap<usize, usize> = BTreeMap::new();
    for idx in order {
        let span = &spans[idx];
        let blocked = accepted
            .range(..span.end)
            .next_back()
            .is_some_and(|(_, &end)| end > span.start);
        if blocked {
            continue;
        }
        if span.start < span.end {
            accepted.insert(span.start, span.end);
        }
        keep[idx] = true;
    }

    let mut kept = Vec::with_capacity(accepted.len());
    let mut dropped = Vec::new();
    for (span, keep) in spans.into_iter().zip(keep) {
        if keep {
            kept.push(span);
        } else {
            debug!("Dropping overlapping {} span {}..{}", span.label, span.start, span.end);
            dropped.push(span);
        }
    }
    (kept, dropped)
}

/// Rewrite `text`, replacing each span with `replace(matched, label)`.
///
/// Spans are applied by `end` descending; equal ends keep collection order.
/// A span that does not fit the text, or that intersects an applied span,
/// is skipped and reported in [`Rewrite::dropped`].
pub fn apply<F>(text: &str, spans: &[Span], mut replace: F) -> Rewrite
where
    F: FnMut(&str, &str) -> String,
{
    let mut order: Vec<&Span> = spans.iter().collect();
    order.sort_by(|a, b| b.end.cmp(&a.end));

    let mut buffer = text.to_string();
    let mut audit = AuditRecord::new();
    let mut dropped = Vec::new();
    // Spans arrive by descending end, so a span intersects an applied one
    // exactly when it ends after the leftmost applied start.
    let mut min_applied_start = usize::MAX;

    for span in order {
        if !span.fits(text) || span.end > min_applied_start {
            debug!("Skipping {} span {}..{}", span.label, span.start, span.end);
            dropped.push(span.clone());
            continue;
        }

        let replacement = replace(&text[span.start..span.end], &span.label);
        buffer.replace_range(span.start..span.end, &replacement);
        audit.push(AuditEntry {
            start: span.start,
            end: span.end,
            replacement,
            label: span.label.clone(),
        });
        min_applied_start = min_applied_start.min(span.start);
    }

    Rewrite {
        text: buffer,
        audit,
        dropped,
    }
}

/// [`apply`] with a transformation policy.
pub fn apply_policy(text: &str, spans: &[Span], policy: Policy) -> Rewrite {
    apply(text, spans, |matched, label| policy.replacement(matched, label))
}
