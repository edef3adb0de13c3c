use std::{
    fmt,
    fs,
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Best score across sessions, with the day it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: usize,
    pub date: String,
}

/// Persistence capability for the high-score record.
///
/// The session treats every failure as "no record" and keeps playing.
pub trait HighScoreStore: fmt::Debug {
    /// Reads the stored record, `Ok(None)` when nothing was stored yet.
    fn load(&mut self) -> Result<Option<HighScore>, StoreError>;

    fn save(&mut self, record: &HighScore) -> Result<(), StoreError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StoreError {
    #[display("failed to access high score file")]
    Io(io::Error),
    #[display("malformed high score record")]
    Format(serde_json::Error),
}

/// In-memory store, for tests and for play without persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    record: Option<HighScore>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(record: HighScore) -> Self {
        Self {
            record: Some(record),
            saves: 0,
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&HighScore> {
        self.record.as_ref()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<HighScore>, StoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &HighScore) -> Result<(), StoreError> {
        self.record = Some(record.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Stores the record as a small JSON document, `{"score": 120, "date": "2026-10-15"}`.
///
/// # Example
///
/// ```
/// use wristris_engine::{HighScore, HighScoreStore, JsonFileStore};
///
/// let dir = tempfile::tempdir()?;
/// let mut store = JsonFileStore::new(dir.path().join("high_score.json"));
/// assert_eq!(store.load()?, None);
///
/// let record = HighScore { score: 40, date: "2026-10-15".to_owned() };
/// store.save(&record)?;
/// assert_eq!(store.load()?, Some(record));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the stored record. A missing file is not an error.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<HighScore>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_slice(&bytes)?;
        Ok(Some(record))
    }

    /// Writes to a sibling temporary file and renames it over the target,
    /// so an interrupted save never leaves a truncated record behind.
    fn save(&mut self, record: &HighScore) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, record)?;
        writeln!(writer)?;
        writer.flush()?;
        drop(writer);
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: usize) -> HighScore {
        HighScore {
            score,
            date: "2026-10-15".to_owned(),
        }
    }

    #[test]
    fn test_save_replaces_record_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&record(70)).unwrap();
        store.save(&record(120)).unwrap();

        let entries = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(entries, vec!["high_score.json"]);
        assert_eq!(store.load().unwrap(), Some(record(120)));
    }

    #[test]
    fn test_failed_save_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&record(70)).unwrap();

        // The rename fails because the target is a directory.
        let mut blocked = JsonFileStore::new(dir.path());
        assert!(blocked.save(&record(120)).is_err());
        assert_eq!(store.load().unwrap(), Some(record(70)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/high_score.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&record(70)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["score"], 70);
        assert_eq!(value["date"], "2026-10-15");
        assert_eq!(store.load().unwrap(), Some(record(70)));
    }

    #[test]
    fn test_corrupt_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("high_score.json");
        fs::write(&path, "{\"score\": \"lots\"").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Format(_))));
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let mut store = JsonFileStore::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Io(_))));
        assert!(matches!(store.save(&record(1)), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("high_score.json"));
        store.clear().unwrap();
        store.save(&record(10)).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::with_record(record(5));
        assert_eq!(store.load().unwrap(), Some(record(5)));
        store.save(&record(15)).unwrap();
        assert_eq!(store.record(), Some(&record(15)));
        assert_eq!(store.saves(), 1);
    }
}
