//! Rental store abstraction with optimistic concurrency.

use berth_common::error::{BerthError, Result};
use berth_common::types::{RentalId, RentalRecord, RentalStatus, RuntimeRef, UserId};

/// The complete target of a conditional write.
///
/// A patch always names both the next status and the next runtime handle,
/// so the ref/status coupling can be checked on every write instead of
/// trusting callers to clear or keep the handle correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPatch {
    /// Status the record transitions to.
    pub status: RentalStatus,
    /// Runtime handle after the transition; must be `Some` exactly when
    /// `status` is runtime-backed.
    pub container_ref: Option<RuntimeRef>,
}

impl RecordPatch {
    /// Returns a `Validation` error when the handle does not match the
    /// target status.
    pub(crate) fn check(&self) -> Result<()> {
        if self.container_ref.is_some() == self.status.is_live() {
            Ok(())
        } else {
            Err(BerthError::Validation {
                message: format!(
                    "patch to {} {} a container ref",
                    self.status,
                    if self.status.is_live() { "requires" } else { "forbids" }
                ),
            })
        }
    }
}

/// Query filter for [`RentalStore::find`].
#[derive(Debug, Clone, Default)]
pub struct RentalFilter {
    /// Match records owned by this user.
    pub user_id: Option<UserId>,
    /// Match records in any of these statuses.
    pub statuses: Option<Vec<RentalStatus>>,
    /// Match the record holding this runtime handle.
    pub container_ref: Option<RuntimeRef>,
    /// Match records with (`true`) or without (`false`) a runtime handle.
    pub has_container_ref: Option<bool>,
    /// Cap on the number of records returned, oldest first. `None`
    /// returns every match; reconciliation depends on seeing them all.
    pub limit: Option<usize>,
}

impl RentalFilter {
    /// Filter by a single status, capped for listing surfaces.
    #[must_use]
    pub fn with_status(status: RentalStatus) -> Self {
        Self {
            statuses: Some(vec![status]),
            limit: Some(berth_common::constants::LIST_LIMIT),
            ..Self::default()
        }
    }

    /// Whether the record passes every populated criterion.
    #[must_use]
    pub fn matches(&self, record: &RentalRecord) -> bool {
        if let Some(user) = &self.user_id {
            if record.user_id != *user {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&record.status) {
                return false;
            }
        }
        if let Some(r) = &self.container_ref {
            if record.container_ref.as_ref() != Some(r) {
                return false;
            }
        }
        if let Some(has) = self.has_container_ref {
            if record.container_ref.is_some() != has {
                return false;
            }
        }
        true
    }
}

/// Durable repository of rental records keyed by rental id.
///
/// Every mutation is optimistic: [`conditional_update`] names the version
/// the caller read, and the write is rejected atomically when the record
/// has moved on. Implementors must apply the version check and the
/// mutation under one critical section.
///
/// [`conditional_update`]: RentalStore::conditional_update
pub trait RentalStore: Send + Sync {
    /// Fetches one record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    fn get(&self, id: &RentalId) -> Result<RentalRecord>;

    /// Returns records matching the filter, oldest first, capped at
    /// `filter.limit` when one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn find(&self, filter: &RentalFilter) -> Result<Vec<RentalRecord>>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a record with the same id already exists.
    fn insert(&self, record: RentalRecord) -> Result<()>;

    /// Applies `patch` iff the stored record still carries
    /// `expected_version`; bumps `version` by one and stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Conflict` for a stale
    /// expected version, and `Validation` when the patch breaks the
    /// ref/status coupling.
    fn conditional_update(
        &self,
        id: &RentalId,
        expected_version: u64,
        patch: RecordPatch,
    ) -> Result<RentalRecord>;
}

/// Applies a checked patch to a record in place. Shared by backends so
/// the version/timestamp discipline cannot drift between them.
pub(crate) fn apply_patch(record: &mut RentalRecord, patch: RecordPatch) {
    record.status = patch.status;
    record.container_ref = patch.container_ref;
    record.version += 1;
    record.updated_at = chrono::Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_common::types::UserId;

    #[test]
    fn patch_rejects_live_status_without_ref() {
        let patch = RecordPatch {
            status: RentalStatus::Active,
            container_ref: None,
        };
        assert!(patch.check().is_err());
    }

    #[test]
    fn patch_rejects_terminal_status_with_ref() {
        let patch = RecordPatch {
            status: RentalStatus::Discarded,
            container_ref: Some(RuntimeRef::new("c1")),
        };
        assert!(patch.check().is_err());
    }

    #[test]
    fn filter_matches_on_user_and_status() {
        let record = RentalRecord::new(UserId::new("alice"), "nginx");
        let filter = RentalFilter {
            user_id: Some(UserId::new("alice")),
            statuses: Some(vec![RentalStatus::Pending, RentalStatus::Active]),
            ..RentalFilter::default()
        };
        assert!(filter.matches(&record));

        let other = RentalFilter {
            user_id: Some(UserId::new("bob")),
            ..RentalFilter::default()
        };
        assert!(!other.matches(&record));
    }

    #[test]
    fn filter_on_ref_presence() {
        let record = RentalRecord::new(UserId::new("alice"), "nginx");
        let with_ref = RentalFilter {
            has_container_ref: Some(true),
            ..RentalFilter::default()
        };
        let without_ref = RentalFilter {
            has_container_ref: Some(false),
            ..RentalFilter::default()
        };
        assert!(!with_ref.matches(&record));
        assert!(without_ref.matches(&record));
    }
}
