//! File-backed problem store shared by all three binaries.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::ProblemRecord;

/// Read a store file strictly: a missing file or malformed JSON is an error.
pub fn load_records(path: &Path) -> Result<Vec<ProblemRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON in {:?}", path))
}

/// Write any serializable value as pretty JSON, through a temp file and a
/// rename so a crash never leaves a half-written file behind.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, body).with_context(|| format!("Failed to write {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {:?}", path))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory view of the store, keyed by problem id, flushed to disk on
/// every upsert.
pub struct ProblemStore {
    path: PathBuf,
    records: Vec<ProblemRecord>,
}

impl ProblemStore {
    /// Open the store at `path`, starting empty when the file does not exist
    /// yet. An existing but unreadable file is an error rather than being
    /// silently overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            load_records(&path)?
        } else {
            Vec::new()
        };
        Ok(ProblemStore { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProblemRecord] {
        &self.records
    }

    pub fn get(&self, problem_id: i64) -> Option<&ProblemRecord> {
        self.records.iter().find(|r| r.problem_id() == problem_id)
    }

    /// Drop any record with the same id, append `record`, and persist.
    /// Returns true when an older copy was replaced.
    pub fn upsert(&mut self, record: ProblemRecord) -> Result<bool> {
        let before = self.records.len();
        let id = record.problem_id();
        self.records.retain(|r| r.problem_id() != id);
        let replaced = self.records.len() != before;
        self.records.push(record);
        self.flush()?;
        Ok(replaced)
    }

    pub fn flush(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.records)
    }
}
