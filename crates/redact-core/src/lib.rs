//! RE-DACT Core: error types, configuration, data directory layout.

pub mod config;
pub mod error;

pub use config::{DataPaths, RedactConfig};
pub use error::{Error, Result};
