//! # emolog-core
//!
//! Core library for emolog - a local-first emotion journal.
//!
//! This library provides:
//! - Domain types for emotion logs and journal entries
//! - The analytics engine and its pattern calculators
//! - Journal stores (in-memory and JSON export)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Raw:** emotion logs and journal entries, owned by a [`JournalStore`]
//! - **Filtered:** the slice of raw data inside a [`TimeRange`](analytics::TimeRange)
//! - **Derived:** patterns, chart data and summaries (always regenerable)
//!
//! ## Example
//!
//! ```rust,no_run
//! use emolog_core::analytics::{create_default_engine, AnalyticsRequest};
//! use emolog_core::{Config, JsonFileStore};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = JsonFileStore::open(config.journal_path()).expect("failed to open journal");
//!
//! let mut engine = create_default_engine(store).with_offset(config.analytics.offset());
//! let result = engine
//!     .generate_analytics(AnalyticsRequest::default())
//!     .expect("analytics failed");
//! println!("{} patterns", result.patterns.len());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use store::{JournalStore, JsonFileStore, MemoryStore};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod store;
pub mod types;
