//! Email address matching.

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_LABEL: &str = "EMAIL";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

/// Finds email addresses: local part, `@`, domain, dot, 2+ letter TLD.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailMatcher;

impl EmailMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Byte ranges of every email address in `text`, left to right.
    pub fn detect_emails(&self, text: &str) -> Vec<(usize, usize)> {
        EMAIL_RE
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    pub fn count(&self, text: &str) -> usize {
        EMAIL_RE.find_iter(text).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_multi_part_domain() {
        let text = "contact me at a.b@example.co.uk";
        let spans = EmailMatcher::new().detect_emails(text);
        assert_eq!(spans.len(), 1);
        let (start, end) = spans[0];
        assert_eq!(&text[start..end], "a.b@example.co.uk");
        assert_eq!(end, text.len());
    }

    #[test]
    fn test_detect_local_part_symbols() {
        let text = "Write to first.last+tag%x@mail-host.org, or to bob@x.io.";
        let matcher = EmailMatcher::new();
        let found: Vec<&str> = matcher
            .detect_emails(text)
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect();
        assert_eq!(found, vec!["first.last+tag%x@mail-host.org", "bob@x.io"]);
        assert_eq!(matcher.count(text), 2);
    }

    #[test]
    fn test_rejects_single_letter_tld() {
        assert!(EmailMatcher::new().detect_emails("user@host.c").is_empty());
        assert!(EmailMatcher::new().detect_emails("no address here").is_empty());
    }
}
