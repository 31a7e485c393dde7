//! Protection protocol: span collection, overlap resolution, rewriting.
//!
//! Collects sensitive spans (custom words, email addresses, recognized
//! entities), settles overlaps deterministically, and rewrites text under a
//! redaction, masking or anonymization policy. Also tracks per-session
//! undo/redo history.

pub mod collector;
pub mod engine;
pub mod policy;
pub mod rewriter;
pub mod session;
pub mod span;
pub mod stats;

pub use collector::{CustomWordMatcher, SpanCollector};
pub use engine::{
    parse_custom_words, read_upload, ProtectionMethod, ProtectionOutcome, ProtectionRequest,
    ProtectionService,
};
pub use policy::{Policy, RedactionLevel};
pub use rewriter::{apply, apply_policy, resolve_overlaps, Rewrite};
pub use session::{CommandHistory, SessionInfo, SessionManager, TransformRecord};
pub use span::{AuditEntry, AuditRecord, Span, SpanKind, SpanSet, CUSTOM_LABEL};
pub use stats::{count_entities, EntityCounts};
