//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Entity types protected when the caller does not choose any.
pub const DEFAULT_ENTITY_TYPES: &[&str] = &["PERSON", "ORG", "GPE", "DATE", "EMAIL"];

/// Files in the uploads directory older than this are swept.
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

pub const DEFAULT_PORT: u16 = 8501;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Paths to all RE-DACT data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Generated output files (`data/uploads/`).
    pub uploads: PathBuf,
    /// Download history log (`data/download_history.json`).
    pub history_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            uploads: root.join("uploads"),
            history_file: root.join("download_history.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.uploads)
    }
}

/// Top-level RE-DACT configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactConfig {
    /// HTTP server port.
    pub port: u16,
    pub data_paths: DataPaths,
    /// Age in days after which generated files are deleted.
    pub retention_days: u64,
    pub default_entity_types: Vec<String>,
}

impl RedactConfig {
    /// Create configuration from environment and defaults.
    ///
    /// Reads `PORT` and `REDACT_RETENTION_DAYS`; unparsable values fall back
    /// to the defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> crate::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let retention_days = std::env::var("REDACT_RETENTION_DAYS")
            .ok()
            .and_then(|d| d.parse().ok())
            .unwrap_or(DEFAULT_RETENTION_DAYS);

        Self::new(data_dir, port, retention_days)
    }

    /// Build a configuration with explicit values.
    pub fn new(data_dir: impl AsRef<Path>, port: u16, retention_days: u64) -> crate::Result<Self> {
        if retention_days == 0 {
            return Err(crate::Error::Config(
                "retention must be at least one day".into(),
            ));
        }

        if retention_days.checked_mul(SECS_PER_DAY).is_none() {
            return Err(crate::Error::Config(format!(
                "retention of {} days is out of range",
                retention_days
            )));
        }

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            retention_days,
            default_entity_types: DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn retention(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.retention_days.saturating_mul(SECS_PER_DAY))
    }
}
