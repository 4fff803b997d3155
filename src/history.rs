use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::knowledge_base::Condition;

/// One saved scan. What gets persisted is the caller's choice; the analysis
/// itself never reads this store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: u64,
    pub scanned_at: DateTime<Utc>,
    pub product_name: Option<String>,
    pub ingredients: Vec<String>,
    pub conditions: Vec<Condition>,
    pub health_score: u8,
    pub summary: String,
}

/// JSON-file-backed store of past scans.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HistoryStore { path: path.into() }
    }

    /// All saved scans. A missing file is an empty history; a file that
    /// exists but does not parse is an error.
    pub fn load(&self) -> Result<Vec<ScanRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file {:?}", self.path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("History file {:?} is malformed", self.path))
    }

    /// Append a scan, assigning the next record id, and rewrite the file.
    pub fn append(
        &self,
        product_name: Option<String>,
        ingredients: Vec<String>,
        conditions: &[Condition],
        health_score: u8,
        summary: &str,
    ) -> Result<ScanRecord> {
        let mut records = self.load()?;
        let id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        let record = ScanRecord {
            id,
            scanned_at: Utc::now(),
            product_name,
            ingredients,
            conditions: conditions.to_vec(),
            health_score,
            summary: summary.to_string(),
        };
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    /// Delete the history file if it exists.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove history file {:?}", self.path))?;
        }
        Ok(())
    }

    fn save(&self, records: &[ScanRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create history directory {:?}", parent))?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_an_empty_history() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_assigns_increasing_ids_and_round_trips() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        let first = store
            .append(
                Some("Sample Cookies".to_string()),
                vec!["sugar".to_string(), "palm oil".to_string()],
                &[Condition::Diabetes],
                42,
                "not great",
            )
            .unwrap();
        let second = store
            .append(None, vec!["oats".to_string()], &[], 95, "fine")
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_name.as_deref(), Some("Sample Cookies"));
        assert_eq!(records[0].conditions, vec![Condition::Diabetes]);
        assert_eq!(records[1].health_score, 95);
    }

    #[test]
    fn malformed_history_is_an_error_not_a_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ this is not json").unwrap();
        let store = HistoryStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        store
            .append(None, vec!["salt".to_string()], &[], 70, "ok")
            .unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
        // clearing an already-missing file is fine
        store.clear().unwrap();
    }
}
