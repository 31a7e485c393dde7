//! Entity frequency counts for analysis.

use std::collections::BTreeMap;

use redact_infer::EMAIL_LABEL;

use crate::collector::SpanCollector;

/// Label → number of occurrences, ordered by label.
pub type EntityCounts = BTreeMap<String, usize>;

/// Count every recognized entity and email address in `text`.
///
/// No label filtering applies. `EMAIL` is always present; other labels only
/// appear when found at least once.
pub fn count_entities(collector: &SpanCollector, text: &str) -> EntityCounts {
    let mut counts = EntityCounts::new();
    for entity in collector.recognizer().detect_entities(text) {
        *counts.entry(entity.label).or_insert(0) += 1;
    }
    counts.insert(EMAIL_LABEL.to_string(), collector.emails().count(text));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::test_support::FixedRecognizer;
    use redact_infer::{EntitySpan, HeuristicRecognizer, NoopRecognizer};

    #[test]
    fn test_email_always_present() {
        let collector = SpanCollector::new(Arc::new(NoopRecognizer));
        let counts = count_entities(&collector, "nothing to see");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["EMAIL"], 0);
    }

    #[test]
    fn test_counts_by_label() {
        let collector = SpanCollector::new(Arc::new(FixedRecognizer(vec![
            EntitySpan::new("PERSON", 0, 1),
            EntitySpan::new("PERSON", 2, 3),
            EntitySpan::new("ORG", 4, 5),
        ])));
        let counts = count_entities(&collector, "a b c x@y.io z@w.org");
        assert_eq!(counts["PERSON"], 2);
        assert_eq!(counts["ORG"], 1);
        assert_eq!(counts["EMAIL"], 2);
        assert!(!counts.contains_key("GPE"));
    }

    #[test]
    fn test_counts_with_heuristic_recognizer() {
        let collector = SpanCollector::new(Arc::new(HeuristicRecognizer::new()));
        let counts = count_entities(
            &collector,
            "John Doe works at ACME Corp, email john@acme.com. Jane Roe moved to Paris.",
        );
        assert_eq!(counts["PERSON"], 2);
        assert_eq!(counts["ORG"], 1);
        assert_eq!(counts["GPE"], 1);
        assert_eq!(counts["EMAIL"], 1);
    }
}
