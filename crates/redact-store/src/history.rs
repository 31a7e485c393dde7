//! Download history: an append-only JSON array in a flat file.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use redact_core::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One produced output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadHistoryEntry {
    pub filename: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Append-only history log. A missing or unreadable file reads as empty.
pub struct DownloadHistory {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl DownloadHistory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `filename` stamped with the current local time.
    pub fn record(&self, filename: &str) -> Result<DownloadHistoryEntry> {
        self.record_at(filename, chrono::Local::now().to_rfc3339())
    }

    pub fn record_at(&self, filename: &str, timestamp: impl Into<String>) -> Result<DownloadHistoryEntry> {
        let entry = DownloadHistoryEntry {
            filename: filename.to_string(),
            timestamp: timestamp.into(),
        };

        let _guard = self.write_lock.lock();
        let mut history = self.list_all();
        history.push(entry.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&history)?)?;
        info!("Download history updated: {}", filename);
        Ok(entry)
    }

    /// All entries, oldest first.
    pub fn list_all(&self) -> Vec<DownloadHistoryEntry> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Error retrieving download history: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(history) => history,
            Err(e) => {
                warn!("Ignoring corrupt download history {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}
