//! RE-DACT Store: generated output files and the download history log.

pub mod files;
pub mod history;

pub use files::{sanitize_filename, FileStore};
pub use history::{DownloadHistory, DownloadHistoryEntry};
