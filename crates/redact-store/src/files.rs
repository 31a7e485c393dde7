//! Output file store with a retention sweep.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use redact_core::{Error, Result};
use tracing::{info, warn};

/// Stores generated text files in a single flat directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a file would have in the store. The name is sanitized first.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(sanitize_filename(filename))
    }

    /// Write `content` under `filename`, replacing any existing file.
    pub fn save(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.path_for(filename);
        std::fs::write(&path, content)?;
        info!("Saved {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }

    /// Read a stored file.
    pub fn load(&self, filename: &str) -> Result<String> {
        let path = self.path_for(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("file {}", sanitize_filename(filename))))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path_for(filename).is_file()
    }

    /// Delete files last modified more than `max_age` ago.
    pub fn cleanup_older_than(&self, max_age: Duration) -> Result<usize> {
        self.cleanup_as_of(SystemTime::now(), max_age)
    }

    /// Delete files whose age at `now` exceeds `max_age`. Returns the number
    /// deleted. Files that cannot be inspected or removed are logged and
    /// skipped.
    pub fn cleanup_as_of(&self, now: SystemTime, max_age: Duration) -> Result<usize> {
        let mut deleted = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            let modified = match entry.metadata().and_then(|m| {
                if m.is_file() {
                    m.modified().map(Some)
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(modified)) => modified,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };

            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age > max_age {
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        info!("Deleted old file: {}", entry.file_name().to_string_lossy());
                        deleted += 1;
                    }
                    Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
                }
            }
        }
        Ok(deleted)
    }

    /// Retention sweep that never fails; errors are logged and swallowed.
    pub fn sweep(&self, max_age: Duration) -> usize {
        match self.cleanup_older_than(max_age) {
            Ok(count) => count,
            Err(e) => {
                warn!("Error during file cleanup: {}", e);
                0
            }
        }
    }
}

/// Sanitize a filename to prevent path traversal.
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', '\\'], "").replace("..", "");

    Path::new(&name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}
