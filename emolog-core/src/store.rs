//! Journal stores: where the engine reads raw logs and entries from.
//!
//! Persistence belongs to the front end. The engine only needs read access
//! plus a way to ask the store to reload, which is what [`JournalStore`]
//! provides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{EmotionLog, JournalEntry};

/// Read access to the raw journal data.
pub trait JournalStore {
    fn emotion_logs(&self) -> &[EmotionLog];

    fn journal_entries(&self) -> &[JournalEntry];

    /// Re-read the underlying data. In-memory stores have nothing to do.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================
// In-memory store
// ============================================

/// Journal export layout: `{ "emotionLogs": [...], "journalEntries": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    #[serde(default)]
    emotion_logs: Vec<EmotionLog>,
    #[serde(default)]
    journal_entries: Vec<JournalEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(emotion_logs: Vec<EmotionLog>, journal_entries: Vec<JournalEntry>) -> Self {
        Self {
            emotion_logs,
            journal_entries,
        }
    }

    pub fn add_emotion_log(&mut self, log: EmotionLog) {
        self.emotion_logs.push(log);
    }

    pub fn add_journal_entry(&mut self, entry: JournalEntry) {
        self.journal_entries.push(entry);
    }

    /// Remove a log by id. Returns the removed log, if it existed.
    pub fn remove_emotion_log(&mut self, id: &str) -> Option<EmotionLog> {
        let index = self.emotion_logs.iter().position(|log| log.id == id)?;
        Some(self.emotion_logs.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.emotion_logs.is_empty() && self.journal_entries.is_empty()
    }
}

impl JournalStore for MemoryStore {
    fn emotion_logs(&self) -> &[EmotionLog] {
        &self.emotion_logs
    }

    fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }
}

// ============================================
// JSON file store
// ============================================

/// Read-only view of a JSON journal export on disk.
///
/// A missing file reads as an empty journal, so a fresh install shows the
/// "nothing logged yet" insights rather than an error.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: MemoryStore,
}

impl JsonFileStore {
    /// Open and load the export at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = Self::load(&path)?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<MemoryStore> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No journal export found, starting empty");
            return Ok(MemoryStore::new());
        }

        let content = std::fs::read_to_string(path)?;
        let data: MemoryStore = serde_json::from_str(&content).map_err(|e| {
            Error::Store(format!("failed to parse journal {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            emotion_logs = data.emotion_logs.len(),
            journal_entries = data.journal_entries.len(),
            "Loaded journal export"
        );
        Ok(data)
    }
}

impl JournalStore for JsonFileStore {
    fn emotion_logs(&self) -> &[EmotionLog] {
        self.data.emotion_logs()
    }

    fn journal_entries(&self) -> &[JournalEntry] {
        self.data.journal_entries()
    }

    fn refresh(&mut self) -> Result<()> {
        self.data = Self::load(&self.path)?;
        Ok(())
    }
}
