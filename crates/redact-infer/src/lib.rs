//! RE-DACT Infer: entity recognition and email matching.
//!
//! Provides the `EntityRecognizer` trait. `HeuristicRecognizer` is the
//! default backend; when a gazetteer file is present in the data directory
//! its terms are added to the built-in rules. The recognizer is loaded once
//! per process and shared read-only.

pub mod email;
pub mod heuristic;
pub mod recognizer;

pub use email::{EmailMatcher, EMAIL_LABEL};
pub use heuristic::HeuristicRecognizer;
pub use recognizer::{EntityRecognizer, EntitySpan, NoopRecognizer};

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use redact_core::Result;

static SHARED: OnceCell<Arc<dyn EntityRecognizer>> = OnceCell::new();

/// Create the recognizer for the given gazetteer path.
///
/// A missing gazetteer file selects the built-in rules. A gazetteer that
/// exists but cannot be loaded is an error: the service must not start with
/// a silently degraded recognizer.
pub fn create_recognizer(gazetteer: &Path) -> Result<Arc<dyn EntityRecognizer>> {
    if gazetteer.exists() {
        let recognizer = HeuristicRecognizer::from_gazetteer(gazetteer)?;
        return Ok(Arc::new(recognizer));
    }

    tracing::info!(
        "No gazetteer at {}. Using built-in entity rules.",
        gazetteer.display()
    );
    Ok(Arc::new(HeuristicRecognizer::new()))
}

/// Load the process-wide recognizer on first call and return it.
///
/// Later calls return the same instance and ignore `gazetteer`.
pub fn load_shared(gazetteer: &Path) -> Result<Arc<dyn EntityRecognizer>> {
    SHARED
        .get_or_try_init(|| create_recognizer(gazetteer))
        .map(Arc::clone)
}

/// The process-wide recognizer, if it has been loaded.
pub fn shared() -> Option<Arc<dyn EntityRecognizer>> {
    SHARED.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_gazetteer_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let recognizer = create_recognizer(&dir.path().join("gazetteer.json")).unwrap();
        assert_eq!(recognizer.name(), "heuristic");
        assert!(recognizer.labels().contains(&"PERSON"));
    }

    #[test]
    fn test_broken_gazetteer_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gazetteer.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(create_recognizer(&path).is_err());
    }

    #[test]
    fn test_shared_is_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let first = load_shared(&dir.path().join("none.json")).unwrap();
        let second = load_shared(&dir.path().join("other.json")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(shared().is_some());
    }
}
