//! JSON-based scan history.
//!
//! Stores each completed scan as a separate JSON file named by its ID.

use crate::config::Paths;
use crate::error::{StorageError, StorageResult};
use crate::scanner::ScanResult;
use crate::types::ScanId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A persisted scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique identifier for this scan.
    pub id: ScanId,
    /// Port specification as the user gave it.
    pub port_spec: String,
    /// Per-probe timeout used.
    pub timeout_ms: u64,
    #[serde(flatten)]
    pub scan: ScanResult,
}

impl ScanRecord {
    pub fn new(scan: ScanResult, port_spec: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            id: ScanId::new(),
            port_spec: port_spec.into(),
            timeout_ms,
            scan,
        }
    }

    /// One-line summary for history listings.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] - {} open of {} checked [{:.2}s]{}",
            self.scan.target,
            self.port_spec,
            self.scan.open_count(),
            self.scan.checked,
            self.scan.duration_ms as f64 / 1000.0,
            if self.scan.cancelled { " (cancelled)" } else { "" }
        )
    }
}

/// JSON file-based scan storage.
#[derive(Debug, Clone)]
pub struct ScanStore {
    scans_dir: PathBuf,
}

impl ScanStore {
    /// Open the store in the application data directory.
    pub fn new() -> StorageResult<Self> {
        Self::at(Paths::get()?.scans_dir())
    }

    /// Open a store rooted at `dir`, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let scans_dir = dir.into();
        fs::create_dir_all(&scans_dir).map_err(|e| StorageError::DirectoryError(e.to_string()))?;
        Ok(Self { scans_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.scans_dir
    }

    /// Save a scan record.
    pub fn save(&self, record: &ScanRecord) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(record)?;
        fs::write(self.scan_file(&record.id), content)
            .map_err(|e| StorageError::SaveFailed(e.to_string()))
    }

    /// Load a scan record by ID.
    pub fn load(&self, id: &ScanId) -> StorageResult<ScanRecord> {
        let file = self.scan_file(id);
        if !file.exists() {
            return Err(StorageError::ScanNotFound(id.to_string()));
        }

        let content =
            fs::read_to_string(&file).map_err(|e| StorageError::LoadFailed(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| StorageError::LoadFailed(e.to_string()))
    }

    /// Find a scan by ID prefix (for example the short form).
    pub fn find_by_prefix(&self, prefix: &str) -> StorageResult<ScanRecord> {
        let matches: Vec<ScanId> = self
            .list_ids()?
            .into_iter()
            .filter(|id| id.matches_prefix(prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(StorageError::ScanNotFound(prefix.to_string())),
            [id] => self.load(id),
            _ => Err(StorageError::LoadFailed(format!(
                "ambiguous prefix '{}': {} matches",
                prefix,
                matches.len()
            ))),
        }
    }

    /// List all scan IDs.
    pub fn list_ids(&self) -> StorageResult<Vec<ScanId>> {
        let entries =
            fs::read_dir(&self.scans_dir).map_err(|e| StorageError::DirectoryError(e.to_string()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| StorageError::DirectoryError(e.to_string()))?
                .path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(id) = path.file_stem().and_then(|s| s.to_str()?.parse::<ScanId>().ok()) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// The `count` most recent scans, newest first. Unreadable files are skipped.
    pub fn list_recent(&self, count: usize) -> StorageResult<Vec<ScanRecord>> {
        let mut records: Vec<ScanRecord> = self
            .list_ids()?
            .iter()
            .filter_map(|id| self.load(id).ok())
            .collect();

        records.sort_by(|a, b| b.scan.started_at.cmp(&a.scan.started_at));
        records.truncate(count);
        Ok(records)
    }

    /// Delete every stored scan, returning how many were removed.
    pub fn clear(&self) -> StorageResult<usize> {
        let ids = self.list_ids()?;
        for id in &ids {
            fs::remove_file(self.scan_file(id)).map_err(|e| StorageError::SaveFailed(e.to_string()))?;
        }
        Ok(ids.len())
    }

    fn scan_file(&self, id: &ScanId) -> PathBuf {
        self.scans_dir.join(format!("{}.json", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortResult, PortStatus};
    use crate::types::{Port, Target};
    use chrono::{Duration, Utc};

    fn record(target: &str, minutes_ago: i64) -> ScanRecord {
        let results = vec![
            PortResult::new(Port::new(22).unwrap(), PortStatus::Open),
            PortResult::new(Port::new(80).unwrap(), PortStatus::Closed),
        ];
        let scan = ScanResult::aggregate(
            Target::new(target).unwrap(),
            results,
            false,
            Utc::now() - Duration::minutes(minutes_ago),
            1500,
        );
        ScanRecord::new(scan, "22,80", 1000)
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::at(dir.path()).unwrap();
        let saved = record("10.0.0.1", 0);

        store.save(&saved).unwrap();
        let loaded = store.load(&saved.id).unwrap();

        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.scan, saved.scan);
        assert_eq!(loaded.port_spec, "22,80");
    }

    #[test]
    fn test_find_by_short_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::at(dir.path()).unwrap();
        let saved = record("10.0.0.1", 0);
        store.save(&saved).unwrap();

        let found = store.find_by_prefix(&saved.id.short()).unwrap();
        assert_eq!(found.id, saved.id);
        assert!(matches!(
            store.find_by_prefix("zzzz"),
            Err(StorageError::ScanNotFound(_))
        ));
    }

    #[test]
    fn test_list_recent_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::at(dir.path()).unwrap();
        store.save(&record("old.host", 30)).unwrap();
        store.save(&record("new.host", 1)).unwrap();
        store.save(&record("mid.host", 10)).unwrap();

        let recent = store.list_recent(2).unwrap();
        let targets: Vec<String> = recent.iter().map(|r| r.scan.target.to_string()).collect();
        assert_eq!(targets, vec!["new.host", "mid.host"]);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScanStore::at(dir.path()).unwrap();
        store.save(&record("a.host", 0)).unwrap();
        store.save(&record("b.host", 0)).unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.list_ids().unwrap().is_empty());
    }

    #[test]
    fn test_summary() {
        let summary = record("10.0.0.1", 0).summary();
        assert!(summary.starts_with("10.0.0.1 [22,80] - 1 open of 2 checked"));
    }
}
