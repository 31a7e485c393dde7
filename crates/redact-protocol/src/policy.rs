//! Transformation policies: redact, mask, anonymize.
//!
//! Policies are total functions from `(matched, label)` to a replacement.
//! Masking and anonymization draw from a random source; nothing is memoized,
//! so the same input yields a fresh value every time.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::span::CUSTOM_LABEL;

pub const REDACTED_PLACEHOLDER: &str = "[Redacted]";
pub const REDACTED_CUSTOM_PLACEHOLDER: &str = "[REDACTED CUSTOM]";
pub const LOW_REDACTION_SUFFIX: &str = "-xxxx";

pub const FAKE_PERSON: &str = "John Doe";
pub const FAKE_ORG: &str = "ACME Corporation";
pub const FAKE_GPE: &str = "Anytown";
pub const FAKE_DATE: &str = "01/01/2000";

pub const ANON_EMAIL_DOMAIN: &str = "anon.com";
const ANONYMOUS_ID_LEN: usize = 8;
const ANONYMOUS_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const FAKE_TOKEN_LEN: usize = 10;

/// How much of a redacted value survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedactionLevel {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[default]
    #[serde(alias = "low")]
    Low,
}

/// A replacement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Redact(RedactionLevel),
    Mask,
    Anonymize,
}

impl Policy {
    /// Replacement for `matched` using the thread-local random source.
    pub fn replacement(&self, matched: &str, label: &str) -> String {
        self.replacement_with(matched, label, &mut rand::thread_rng())
    }

    /// Replacement for `matched` drawing randomness from `rng`.
    pub fn replacement_with<R: Rng>(&self, matched: &str, label: &str, rng: &mut R) -> String {
        match self {
            Policy::Redact(_) if label == CUSTOM_LABEL => REDACTED_CUSTOM_PLACEHOLDER.to_string(),
            Policy::Redact(level) => partially_redact(matched, *level),
            Policy::Mask => fake_data(label, rng),
            Policy::Anonymize if label == redact_infer::EMAIL_LABEL => {
                format!("{}@{}", anonymous_id(rng), ANON_EMAIL_DOMAIN)
            }
            Policy::Anonymize => anonymous_id(rng),
        }
    }
}

/// Obscure `word` according to `level`.
///
/// Halving counts Unicode scalar values; the first `n / 2` survive.
pub fn partially_redact(word: &str, level: RedactionLevel) -> String {
    let n = word.chars().count();
    let kept: String = word.chars().take(n / 2).collect();
    match level {
        RedactionLevel::High => REDACTED_PLACEHOLDER.to_string(),
        RedactionLevel::Medium => {
            let mut out = kept;
            out.extend(std::iter::repeat('x').take(n - n / 2));
            out
        }
        RedactionLevel::Low => format!("{}{}", kept, LOW_REDACTION_SUFFIX),
    }
}

/// A structurally similar stand-in for a value labelled `label`.
pub fn fake_data<R: Rng>(label: &str, rng: &mut R) -> String {
    match label {
        "PERSON" => FAKE_PERSON.to_string(),
        "ORG" => FAKE_ORG.to_string(),
        "GPE" => FAKE_GPE.to_string(),
        "DATE" => FAKE_DATE.to_string(),
        "EMAIL" => format!("user{}@example.com", rng.gen_range(1000..=9999)),
        _ => (0..FAKE_TOKEN_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect(),
    }
}

/// An 8-character token of uppercase letters and digits.
pub fn anonymous_id<R: Rng>(rng: &mut R) -> String {
    (0..ANONYMOUS_ID_LEN)
        .map(|_| char::from(ANONYMOUS_ID_CHARSET[rng.gen_range(0..ANONYMOUS_ID_CHARSET.len())]))
        .collect()
}
