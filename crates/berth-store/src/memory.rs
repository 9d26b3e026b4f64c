//! In-process rental store backed by a mutex-guarded map.

use std::collections::HashMap;
use std::sync::Mutex;

use berth_common::error::{BerthError, Result};
use berth_common::types::{RentalId, RentalRecord};

use crate::store::{RecordPatch, RentalFilter, RentalStore, apply_patch};

/// Rental store holding all records in memory.
///
/// The mutex covers both the version check and the mutation, so a
/// conditional update is atomic with respect to concurrent writers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RentalId, RentalRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<RentalId, RentalRecord>>> {
        self.records.lock().map_err(|_| BerthError::Runtime {
            message: "rental store lock poisoned".into(),
        })
    }
}

impl RentalStore for MemoryStore {
    fn get(&self, id: &RentalId) -> Result<RentalRecord> {
        let records = self.lock()?;
        records.get(id).cloned().ok_or_else(|| BerthError::NotFound {
            kind: "rental",
            id: id.to_string(),
        })
    }

    fn find(&self, filter: &RentalFilter) -> Result<Vec<RentalRecord>> {
        let records = self.lock()?;
        let mut out: Vec<RentalRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    fn insert(&self, record: RentalRecord) -> Result<()> {
        let mut records = self.lock()?;
        if records.contains_key(&record.id) {
            return Err(BerthError::Conflict {
                id: record.id.to_string(),
                message: "record already exists".into(),
            });
        }
        tracing::debug!(id = %record.id, user = %record.user_id, "record inserted");
        let _ = records.insert(record.id.clone(), record);
        Ok(())
    }

    fn conditional_update(
        &self,
        id: &RentalId,
        expected_version: u64,
        patch: RecordPatch,
    ) -> Result<RentalRecord> {
        patch.check()?;
        let mut records = self.lock()?;
        let record = records.get_mut(id).ok_or_else(|| BerthError::NotFound {
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
        Ok(record.clone())
    }
}
