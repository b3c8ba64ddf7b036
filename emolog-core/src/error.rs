//! Error types for emolog-core

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Main error type for the emolog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A time range whose end precedes its start
    #[error("invalid time range: end {end} is before start {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Unrecognized time range preset name
    #[error("unknown time range preset: {0} (expected week, month, quarter or year)")]
    UnknownPreset(String),

    /// Unrecognized insight/pattern type name
    #[error("unknown pattern type: {0}")]
    UnknownPatternType(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Journal store error
    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias for emolog-core
pub type Result<T> = std::result::Result<T, Error>;
