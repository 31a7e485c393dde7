//! Shared application state.

use std::sync::Arc;

use redact_core::{RedactConfig, Result};
use redact_infer::EntityRecognizer;
use redact_protocol::{ProtectionService, SessionManager};
use redact_store::{DownloadHistory, FileStore};
use tracing::info;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: RedactConfig,
    pub service: ProtectionService,
    pub files: FileStore,
    pub history: DownloadHistory,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(config: RedactConfig, recognizer: Arc<dyn EntityRecognizer>) -> Result<Self> {
        let files = FileStore::new(&config.data_paths.uploads)?;
        let history = DownloadHistory::new(&config.data_paths.history_file);

        info!(
            "Recognizer: {} ({} labels)",
            recognizer.name(),
            recognizer.labels().len()
        );

        Ok(Self {
            service: ProtectionService::new(recognizer),
            files,
            history,
            sessions: SessionManager::new(),
            config,
        })
    }

    /// Run the retention sweep on the blocking pool. Failures are logged
    /// inside the sweep and never reach the caller.
    pub fn spawn_sweep(&self) -> tokio::task::JoinHandle<usize> {
        let files = self.files.clone();
        let retention = self.config.retention();
        tokio::task::spawn_blocking(move || {
            let deleted = files.sweep(retention);
            if deleted > 0 {
                info!("Retention sweep removed {} file(s)", deleted);
            }
            deleted
        })
    }
}
