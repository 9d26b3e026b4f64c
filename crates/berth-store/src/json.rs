//! File-backed rental store.
//!
//! Maintains a JSON index of all rental records, written atomically via a
//! temp file and rename so a crash mid-write never truncates the index.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use berth_common::error::{BerthError, Result};
use berth_common::types::{RentalId, RentalRecord};
use serde::{Deserialize, Serialize};

use crate::store::{RecordPatch, RentalFilter, RentalStore, apply_patch};

/// On-disk shape of the rental index.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    records: Vec<RentalRecord>,
}

/// Rental store persisted as a single JSON index file.
///
/// All access is serialized through one lock; each mutation is a
/// load-modify-save cycle, which keeps the expected-version check atomic
/// within the process.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonStore {
    /// Opens (or lazily creates) the index at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Returns the index file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Index> {
        if !self.path.exists() {
            return Ok(Index::default());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| BerthError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        if raw.trim().is_empty() {
            return Ok(Index::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, index: &Index) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| BerthError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(index)?;
        let mut file = std::fs::File::create(&tmp).map_err(|e| BerthError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        file.write_all(&body).map_err(|e| BerthError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| BerthError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| BerthError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), records = index.records.len(), "index saved");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.guard.lock().map_err(|_| BerthError::Runtime {
            message: "rental index lock poisoned".into(),
        })
    }
}

impl RentalStore for JsonStore {
    fn get(&self, id: &RentalId) -> Result<RentalRecord> {
        let _guard = self.lock()?;
        let index = self.load()?;
        index
            .records
            .into_iter()
            .find(|r| r.id == *id)
            .ok_or_else(|| BerthError::NotFound {
                kind: "rental",
                id: id.to_string(),
            })
    }

    fn find(&self, filter: &RentalFilter) -> Result<Vec<RentalRecord>> {
        let _guard = self.lock()?;
        let index = self.load()?;
        let mut out: Vec<RentalRecord> = index
            .records
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    fn insert(&self, record: RentalRecord) -> Result<()> {
        let _guard = self.lock()?;
        let mut index = self.load()?;
        if index.records.iter().any(|r| r.id == record.id) {
            return Err(BerthError::Conflict {
                id: record.id.to_string(),
                message: "record already exists".into(),
            });
        }
        tracing::debug!(id = %record.id, user = %record.user_id, "record inserted");
        index.records.push(record);
        self.save(&index)
    }

    fn conditional_update(
        &self,
        id: &RentalId,
        expected_version: u64,
        patch: RecordPatch,
    ) -> Result<RentalRecord> {
        patch.check()?;
        let _guard = self.lock()?;
        let mut index = self.load()?;
        let record = index
            .records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| BerthError::NotFound {
                kind: "rental",
                id: id.to_string(),
            })?;
        if record.version != expected_version {
            return Err(BerthError::Conflict {
                id: id.to_string(),
                message: format!(
                    "expected version {expected_version}, found {}",
                    record.version
                ),
            });
        }
        apply_patch(record, patch);
        let updated = record.clone();
        self.save(&index)?;
        Ok(updated)
    }
}
