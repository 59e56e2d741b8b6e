//! Durable translation history.
//!
//! The store keeps one sled key holding the JSON-serialized record list,
//! newest first. The whole list is rewritten on every mutation and flushed
//! before the call returns, so no partial-write state is ever observable.

use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use tracing::{debug, warn};

use crate::document::DocumentStructure;
use crate::error::{Error, Result};

/// Storage key holding the serialized record list.
const HISTORY_KEY: &str = "translations";

/// A durable snapshot of a completed translation.
///
/// Created by copy at export time; never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Time-derived, unique; delete-by-id relies on uniqueness
    pub id: i64,
    pub file_name: String,
    /// ISO-8601 timestamp
    pub date: String,
    pub original_text: String,
    pub translated_text: String,
    pub document_structure: Option<DocumentStructure>,
    pub layout_preserved: bool,
}

/// Sled-backed history store.
pub struct HistoryStore {
    db: Db,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Open (or create) the history database and load the record list.
    ///
    /// A corrupt persisted list fails soft to an empty one; only store-level
    /// failures (e.g. the directory is locked) are errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::HistoryInit(format!(
                    "Failed to create history directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = sled::open(path).map_err(|e| {
            let err_str = e.to_string();
            // Detect lock errors and provide actionable fix
            if err_str.contains("WouldBlock") || err_str.contains("lock") {
                Error::HistoryInit(format!(
                    "History store locked at {}\n\n\
                    Another process is using the store, or a previous instance crashed.\n\
                    To fix: rm {}/db/LOCK",
                    path.display(),
                    path.display()
                ))
            } else {
                Error::HistoryInit(format!(
                    "Failed to open history store at {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let records = Self::load_records(&db);
        debug!(
            "Opened history store at {} ({} records)",
            path.display(),
            records.len()
        );

        Ok(Self { db, records })
    }

    fn load_records(db: &Db) -> Vec<HistoryRecord> {
        match db.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_slice(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!("Failed to load translation history, resetting: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("History read error, resetting: {}", e);
                Vec::new()
            }
        }
    }

    /// All records, newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Prepend a record and persist the full list.
    ///
    /// Time-derived ids can collide within a millisecond; the id is bumped
    /// past the newest existing record to keep delete-by-id unambiguous.
    pub fn add(&mut self, mut record: HistoryRecord) -> Result<()> {
        if let Some(max_id) = self.records.iter().map(|r| r.id).max()
            && record.id <= max_id
        {
            record.id = max_id + 1;
        }

        self.records.insert(0, record);
        self.persist()
    }

    /// Remove all records with the given id (expected exactly one), keeping
    /// the relative order of the rest, and persist.
    pub fn delete_by_id(&mut self, id: i64) -> Result<()> {
        self.records.retain(|r| r.id != id);
        self.persist()
    }

    /// Truncate the history to empty and persist.
    ///
    /// The confirmation flag is the blocking yes/no gate: without it the
    /// history is left untouched.
    pub fn clear_all(&mut self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Ok(());
        }
        self.records.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_vec(&self.records)
            .map_err(|e| Error::HistoryWrite(e.to_string()))?;

        self.db
            .insert(HISTORY_KEY, raw)
            .map_err(|e| Error::HistoryWrite(e.to_string()))?;

        // Flush to ensure persistence
        self.db
            .flush()
            .map_err(|e| Error::HistoryWrite(format!("Flush failed: {e}")))?;

        Ok(())
    }
}
