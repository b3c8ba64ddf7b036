//! Core domain types for emolog
//!
//! These are the raw records produced by the journaling front end and read
//! (never mutated) by the analytics engine.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Emotion log** | A short "micro-emotion" entry: a few words about how the person feels right now |
//! | **Expressed** | The feeling was let out (said, written, shown) |
//! | **Suppressed** | The feeling was held back |
//! | **Journal entry** | A longer free-text page tied to a calendar date |
//! | **Quick emotion** | An optional category tag picked from a fixed palette in the UI |
//!
//! Both record types serialize in camelCase, with instants encoded as
//! milliseconds since the Unix epoch, matching the journal export format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::Timestamped;

// ============================================
// Emotion logs
// ============================================

/// Whether a logged feeling was let out or held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionAction {
    Expressed,
    Suppressed,
}

impl EmotionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionAction::Expressed => "expressed",
            EmotionAction::Suppressed => "suppressed",
        }
    }
}

impl std::str::FromStr for EmotionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expressed" => Ok(EmotionAction::Expressed),
            "suppressed" => Ok(EmotionAction::Suppressed),
            _ => Err(format!("unknown emotion action: {}", s)),
        }
    }
}

/// One micro-emotion entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionLog {
    /// Unique identifier
    pub id: String,
    /// Free text, usually a single word or short phrase ("anxious", "proud")
    pub content: String,
    /// Expressed or suppressed
    pub action: EmotionAction,
    /// When the feeling was logged
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Display color picked in the UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Quick-emotion category tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_emotion: Option<String>,
}

impl EmotionLog {
    /// Create a log with a freshly generated id.
    pub fn new(content: impl Into<String>, action: EmotionAction, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            action,
            timestamp,
            color: None,
            quick_emotion: None,
        }
    }

    pub fn is_expressed(&self) -> bool {
        self.action == EmotionAction::Expressed
    }
}

impl Timestamped for EmotionLog {
    fn effective_time(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

// ============================================
// Journal entries
// ============================================

/// A longer journal page.
///
/// The analytics engine only counts these per time window; it never looks at
/// the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    /// Calendar date the page belongs to
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_count: usize,
    /// Emotion logs linked from this page
    #[serde(default)]
    pub emotion_log_ids: Vec<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Timestamped for JournalEntry {
    /// The page date (at 00:00 UTC) wins over the creation instant.
    fn effective_time(&self) -> Option<DateTime<Utc>> {
        self.date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .or(self.created_at)
    }
}
