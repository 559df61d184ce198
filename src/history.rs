//! Recently suggested business names, persisted between runs.

#[cfg(test)]
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use log::{info, debug};

use crate::error::{Result, WetError};

/// Storage for the history list. The pipeline only ever loads once and saves once.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, history: &[String]) -> Result<()>;
}

/// JSON array of strings on disk, overwritten on every save.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<String>> {
        debug!("Reading history from {}", self.path.display());
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            WetError::History(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let history: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            WetError::History(format!("{} is not a JSON array of names: {}", self.path.display(), e))
        })?;
        info!("Loaded {} history entries", history.len());
        Ok(history)
    }

    fn save(&self, history: &[String]) -> Result<()> {
        let raw = serde_json::to_string(history)
            .map_err(|e| WetError::History(format!("cannot encode history: {}", e)))?;
        fs::write(&self.path, raw).map_err(|e| {
            WetError::History(format!("cannot write {}: {}", self.path.display(), e))
        })?;
        info!("Saved {} history entries to {}", history.len(), self.path.display());
        Ok(())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RefCell<Vec<String>>,
    saves: RefCell<usize>,
}

#[cfg(test)]
impl MemoryHistoryStore {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries: RefCell::new(entries),
            saves: RefCell::new(0),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

#[cfg(test)]
impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.entries())
    }

    fn save(&self, history: &[String]) -> Result<()> {
        *self.entries.borrow_mut() = history.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        fs::write(&path, r#"["Zingerman's Delicatessen"]"#).unwrap();

        let store = FileHistoryStore::new(&path);
        let mut history = store.load().unwrap();
        assert_eq!(history, vec!["Zingerman's Delicatessen"]);

        history.push("Frita Batidos".to_string());
        store.save(&history).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"["Zingerman's Delicatessen","Frita Batidos"]"#
        );
    }

    #[test]
    fn test_missing_history_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("history"));
        assert!(matches!(store.load(), Err(WetError::History(_))));
    }

    #[test]
    fn test_malformed_history_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        fs::write(&path, r#"{"not": "a list"}"#).unwrap();
        assert!(matches!(FileHistoryStore::new(&path).load(), Err(WetError::History(_))));
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryHistoryStore::new(vec!["A".to_string()]);
        assert_eq!(store.save_count(), 0);
        store.save(&["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(store.entries(), vec!["A", "B"]);
        assert_eq!(store.save_count(), 1);
    }
}
