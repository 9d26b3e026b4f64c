//! Rental state machine.
//!
//! Validates and executes user- and admin-initiated transitions over
//! rental records, driving the container engine and the record store
//! together. Valid edges:
//!
//! ```text
//! pending --approve--> active --save--> saved --restore--> active
//! pending --reject--> rejected
//! active  --stop-->   stopped --restore--> active
//! active|saved|stopped --discard--> discarded
//! ```
//!
//! Every operation that touches both collaborators performs the engine
//! side effect first and the conditional store write second; when the
//! write loses a race after a container was created, a compensating
//! removal keeps the engine from holding a resource no record accounts
//! for. `rejected` and `discarded` are terminal; records are retained
//! for audit, never deleted.

use std::sync::Arc;

use berth_common::constants::LIST_LIMIT;
use berth_common::error::{BerthError, Result};
use berth_common::types::{RentalId, RentalRecord, RentalStatus, RuntimeRef, UserId};
use berth_runtime::{ContainerRuntime, RuntimeContainer};
use berth_store::{RecordPatch, RentalFilter, RentalStore};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::Identity;

/// Acknowledgement returned by [`RentalStateMachine::restore_rental`].
///
/// Restoring is two-phase: this receipt confirms eligibility and records
/// the intent in the record itself; the actual resume is a later
/// admin-approved transition. No container is created by the request.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreReceipt {
    /// Rental the restore was requested for.
    pub rental: RentalId,
    /// Status the record held when the request was accepted.
    pub status: RentalStatus,
    /// When the intent was recorded.
    pub requested_at: DateTime<Utc>,
}

/// State machine over rental records, constructed from injected
/// collaborators.
pub struct RentalStateMachine {
    store: Arc<dyn RentalStore>,
    runtime: Arc<dyn ContainerRuntime>,
    identity: Arc<dyn Identity>,
}

impl RentalStateMachine {
    /// Creates a state machine over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn RentalStore>,
        runtime: Arc<dyn ContainerRuntime>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        Self {
            store,
            runtime,
            identity,
        }
    }

    /// Files a rental request, creating a `pending` record.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the image is empty or the user is unknown.
    pub fn request_rental(&self, user_id: &UserId, image: &str) -> Result<RentalRecord> {
        let image = image.trim();
        if image.is_empty() {
            return Err(BerthError::Validation {
                message: "image reference is empty".into(),
            });
        }
        if !self.identity.exists(user_id)? {
            return Err(BerthError::Validation {
                message: format!("unknown user: {user_id}"),
            });
        }

        let record = RentalRecord::new(user_id.clone(), image);
        self.store.insert(record.clone())?;
        tracing::info!(id = %record.id, user = %user_id, image, "rental requested");
        Ok(record)
    }

    /// Approves a pending request: creates the container, then writes
    /// `active` with the new handle. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the record is `pending`,
    /// `Runtime` if the engine cannot create the container (record left
    /// `pending`), `Conflict` if the record changed while the container
    /// was being created (the fresh container is removed again), and
    /// `PartialFailure` if that compensating removal itself fails.
    pub fn approve_rental(&self, id: &RentalId) -> Result<RentalRecord> {
        let record = self.precondition(id, RentalStatus::Pending, "approve")?;

        let handle = self.runtime.create(&record.image)?;
        let write = self.store.conditional_update(
            id,
            record.version,
            RecordPatch {
                status: RentalStatus::Active,
                container_ref: Some(handle.clone()),
            },
        );

        match write {
            Ok(updated) => {
                tracing::info!(id = %id, container = %handle, "rental approved");
                Ok(updated)
            }
            Err(write_err) => {
                tracing::warn!(
                    id = %id,
                    container = %handle,
                    error = %write_err,
                    "approval write lost a race; removing fresh container"
                );
                self.compensate_create(id, &handle)?;
                Err(write_err)
            }
        }
    }

    /// Rejects a pending request. No engine call. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the record is `pending`, or
    /// `Conflict` if the record changed concurrently.
    pub fn reject_rental(&self, id: &RentalId) -> Result<RentalRecord> {
        let record = self.precondition(id, RentalStatus::Pending, "reject")?;
        let updated = self.store.conditional_update(
            id,
            record.version,
            RecordPatch {
                status: RentalStatus::Rejected,
                container_ref: None,
            },
        )?;
        tracing::info!(id = %id, "rental rejected");
        Ok(updated)
    }

    /// Snapshots an active rental: stops the container, then writes
    /// `saved`. An already-absent container counts as stopped; the
    /// engine, not caller intent, is authoritative for "is it running".
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless `user_id` owns the record,
    /// `InvalidTransition` unless it is `active`, `Runtime` on engine
    /// failure, `Conflict` on a lost write (the record converges on the
    /// next reconciler pass).
    pub fn save_rental(&self, id: &RentalId, user_id: &UserId) -> Result<RentalRecord> {
        let record = self.owned(id, user_id)?;
        if record.status != RentalStatus::Active {
            return Err(BerthError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                action: "save",
            });
        }
        let handle = Self::handle_of(&record)?;

        match self.runtime.stop(&handle) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(id = %id, container = %handle, "container already absent; treating as stopped");
            }
            Err(e) => return Err(e),
        }

        let updated = self.store.conditional_update(
            id,
            record.version,
            RecordPatch {
                status: RentalStatus::Saved,
                container_ref: Some(handle.clone()),
            },
        )?;
        tracing::info!(id = %id, container = %handle, "rental saved");
        Ok(updated)
    }

    /// Requests a restore of a saved or stopped rental.
    ///
    /// Validates eligibility and records the intent as a same-status
    /// touch of the record; the resume itself is a separate
    /// admin-approved transition.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless `user_id` owns the record,
    /// `InvalidTransition` unless it is `saved` or `stopped`, `Conflict`
    /// if the record changed concurrently.
    pub fn restore_rental(&self, id: &RentalId, user_id: &UserId) -> Result<RestoreReceipt> {
        let record = self.owned(id, user_id)?;
        if !matches!(record.status, RentalStatus::Saved | RentalStatus::Stopped) {
            return Err(BerthError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                action: "restore",
            });
        }

        // Same-status write: marks the request in version/updated_at
        // without moving along the graph.
        let updated = self.store.conditional_update(
            id,
            record.version,
            RecordPatch {
                status: record.status,
                container_ref: record.container_ref.clone(),
            },
        )?;
        tracing::info!(id = %id, status = %updated.status, "restore requested; awaiting admin resume");
        Ok(RestoreReceipt {
            rental: updated.id,
            status: updated.status,
            requested_at: updated.updated_at,
        })
    }

    /// Releases a rental: force-removes the container (absence
    /// tolerated), then writes `discarded` with the handle cleared.
    /// Allowed for the owner or an admin, from any runtime-backed status.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the actor is admin or owner,
    /// `InvalidTransition` unless the record is runtime-backed,
    /// `Runtime` on engine failure, `Conflict` on a lost write.
    pub fn discard_rental(
        &self,
        id: &RentalId,
        actor: &UserId,
        admin: bool,
    ) -> Result<RentalRecord> {
        let record = self.store.get(id)?;
        if !admin && record.user_id != *actor {
            return Err(BerthError::Unauthorized {
                message: format!("user {actor} does not own rental {id}"),
            });
        }
        if !record.status.is_live() {
            return Err(BerthError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                action: "discard",
            });
        }
        let handle = Self::handle_of(&record)?;

        match self.runtime.remove(&handle) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(id = %id, container = %handle, "container already absent; discarding record anyway");
            }
            Err(e) => return Err(e),
        }

        let updated = self.store.conditional_update(
            id,
            record.version,
            RecordPatch {
                status: RentalStatus::Discarded,
                container_ref: None,
            },
        )?;
        tracing::info!(id = %id, container = %handle, "rental discarded");
        Ok(updated)
    }

    /// Force-stops a container by its engine handle and best-effort
    /// drives the owning record `active -> stopped`. Admin only.
    ///
    /// A container with no owning record is stopped anyway; the missing
    /// record is logged as an inconsistency for the reconciler. Returns
    /// the updated record when one was found.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the engine does not know the handle,
    /// `Runtime` on other engine failures.
    pub fn stop_container(&self, handle: &RuntimeRef) -> Result<Option<RentalRecord>> {
        self.runtime.stop(handle)?;
        tracing::info!(container = %handle, "container force-stopped");

        let Some(record) = self.record_for(handle)? else {
            tracing::warn!(container = %handle, "stopped container has no owning record");
            return Ok(None);
        };
        if record.status != RentalStatus::Active {
            // Already saved or stopped; the graph has no edge to take.
            return Ok(Some(record));
        }

        let write = self.store.conditional_update(
            &record.id,
            record.version,
            RecordPatch {
                status: RentalStatus::Stopped,
                container_ref: Some(handle.clone()),
            },
        );
        match write {
            Ok(updated) => Ok(Some(updated)),
            Err(e) if matches!(e, BerthError::Conflict { .. }) => {
                tracing::warn!(id = %record.id, error = %e, "record moved concurrently; leaving it to the reconciler");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Force-removes a container by its engine handle and best-effort
    /// drives the owning record to `discarded`. Admin only.
    ///
    /// Engine absence is tolerated while a record still references the
    /// handle (the record is repaired); `NotFound` is returned only when
    /// neither the engine nor the store knows the handle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` as above, `Runtime` on other engine failures.
    pub fn delete_container(&self, handle: &RuntimeRef) -> Result<Option<RentalRecord>> {
        let engine_knew = match self.runtime.remove(handle) {
            Ok(()) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };
        if engine_knew {
            tracing::info!(container = %handle, "container force-removed");
        }

        let Some(record) = self.record_for(handle)? else {
            if engine_knew {
                tracing::warn!(container = %handle, "removed container had no owning record");
                return Ok(None);
            }
            return Err(BerthError::NotFound {
                kind: "container",
                id: handle.to_string(),
            });
        };

        let write = self.store.conditional_update(
            &record.id,
            record.version,
            RecordPatch {
                status: RentalStatus::Discarded,
                container_ref: None,
            },
        );
        match write {
            Ok(updated) => {
                tracing::info!(id = %updated.id, container = %handle, "rental discarded via runtime handle");
                Ok(Some(updated))
            }
            Err(e) if matches!(e, BerthError::Conflict { .. }) => {
                tracing::warn!(id = %record.id, error = %e, "record moved concurrently; leaving it to the reconciler");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Records awaiting an admin decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_pending(&self) -> Result<Vec<RentalRecord>> {
        self.store.find(&RentalFilter::with_status(RentalStatus::Pending))
    }

    /// Records snapshotted by their owners.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_saved(&self) -> Result<Vec<RentalRecord>> {
        self.store.find(&RentalFilter::with_status(RentalStatus::Saved))
    }

    /// A user's own rentals in the statuses they can act on.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn my_servers(&self, user_id: &UserId) -> Result<Vec<RentalRecord>> {
        self.store.find(&RentalFilter {
            user_id: Some(user_id.clone()),
            statuses: Some(vec![
                RentalStatus::Pending,
                RentalStatus::Active,
                RentalStatus::Saved,
            ]),
            limit: Some(LIST_LIMIT),
            ..RentalFilter::default()
        })
    }

    /// Snapshot of the engine's full inventory. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be queried.
    pub fn list_all_containers(&self) -> Result<Vec<RuntimeContainer>> {
        self.runtime.list()
    }

    /// Reads the record and checks the single-status precondition shared
    /// by approve and reject.
    fn precondition(
        &self,
        id: &RentalId,
        expected: RentalStatus,
        action: &'static str,
    ) -> Result<RentalRecord> {
        let record = self.store.get(id)?;
        if record.status != expected {
            return Err(BerthError::InvalidTransition {
                id: id.to_string(),
                from: record.status,
                action,
            });
        }
        Ok(record)
    }

    /// Reads the record and checks ownership.
    fn owned(&self, id: &RentalId, user_id: &UserId) -> Result<RentalRecord> {
        let record = self.store.get(id)?;
        if record.user_id != *user_id {
            return Err(BerthError::Unauthorized {
                message: format!("user {user_id} does not own rental {id}"),
            });
        }
        Ok(record)
    }

    /// The live record referencing an engine handle, if any.
    fn record_for(&self, handle: &RuntimeRef) -> Result<Option<RentalRecord>> {
        let hits = self.store.find(&RentalFilter {
            container_ref: Some(handle.clone()),
            ..RentalFilter::default()
        })?;
        Ok(hits.into_iter().next())
    }

    /// Extracts the handle a live record must carry.
    fn handle_of(record: &RentalRecord) -> Result<RuntimeRef> {
        record
            .container_ref
            .clone()
            .ok_or_else(|| BerthError::Validation {
                message: format!("rental {} is {} but carries no container handle", record.id, record.status),
            })
    }

    /// Removes a container created by an approval whose store write was
    /// lost. A compensation failure is the one case where engine and
    /// store are left divergent; it is logged in full and surfaced as
    /// `PartialFailure` for the reconciler to repair.
    fn compensate_create(&self, id: &RentalId, handle: &RuntimeRef) -> Result<()> {
        match self.runtime.remove(handle) {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => {
                let partial = BerthError::PartialFailure {
                    rental: id.to_string(),
                    container: handle.to_string(),
                    message: e.to_string(),
                };
                tracing::error!(
                    id = %id,
                    container = %handle,
                    error = %e,
                    "compensating removal failed; store and engine diverge until reconciled"
                );
                Err(partial)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_runtime::{MemoryBackend, RuntimeStatus};
    use berth_store::MemoryStore;

    use crate::identity::StaticRegistry;

    struct Fixture {
        machine: RentalStateMachine,
        store: Arc<MemoryStore>,
        runtime: Arc<MemoryBackend>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let runtime = Arc::new(MemoryBackend::new());
        let identity = Arc::new(StaticRegistry::with_users([
            ("alice", "s3cret"),
            ("bob", "hunter2"),
        ]));
        let machine = RentalStateMachine::new(store.clone(), runtime.clone(), identity);
        Fixture {
            machine,
            store,
            runtime,
        }
    }

    fn alice() -> UserId {
        UserId::new("alice")
    }

    #[test]
    fn request_creates_pending_record() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        assert_eq!(record.status, RentalStatus::Pending);
        assert!(record.container_ref.is_none());
        assert!(record.ref_matches_status());
    }

    #[test]
    fn request_rejects_empty_image() {
        let f = fixture();
        let err = f.machine.request_rental(&alice(), "   ").unwrap_err();
        assert!(matches!(err, BerthError::Validation { .. }));
    }

    #[test]
    fn request_rejects_unknown_user() {
        let f = fixture();
        let err = f
            .machine
            .request_rental(&UserId::new("mallory"), "nginx")
            .unwrap_err();
        assert!(matches!(err, BerthError::Validation { .. }));
    }

    #[test]
    fn approve_activates_and_attaches_handle() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let approved = f.machine.approve_rental(&record.id).expect("approve");
        assert_eq!(approved.status, RentalStatus::Active);
        assert!(approved.ref_matches_status());
        assert_eq!(f.runtime.len().expect("len"), 1);
    }

    #[test]
    fn approve_twice_is_invalid_transition_without_extra_container() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        let err = f.machine.approve_rental(&record.id).unwrap_err();
        assert!(matches!(err, BerthError::InvalidTransition { .. }));
        assert_eq!(f.runtime.len().expect("len"), 1);
    }

    #[test]
    fn reject_makes_record_terminal() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let rejected = f.machine.reject_rental(&record.id).expect("reject");
        assert_eq!(rejected.status, RentalStatus::Rejected);
        assert!(rejected.status.is_terminal());
        assert_eq!(f.runtime.len().expect("len"), 0);

        let err = f.machine.approve_rental(&record.id).unwrap_err();
        assert!(matches!(err, BerthError::InvalidTransition { .. }));
    }

    #[test]
    fn save_stops_container_and_keeps_handle() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let approved = f.machine.approve_rental(&record.id).expect("approve");
        let handle = approved.container_ref.clone().expect("handle");

        let saved = f.machine.save_rental(&record.id, &alice()).expect("save");
        assert_eq!(saved.status, RentalStatus::Saved);
        assert_eq!(saved.container_ref, Some(handle.clone()));
        assert_eq!(
            f.runtime.inspect(&handle).expect("inspect"),
            RuntimeStatus::Stopped
        );
    }

    #[test]
    fn save_by_non_owner_is_unauthorized() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        let err = f
            .machine
            .save_rental(&record.id, &UserId::new("bob"))
            .unwrap_err();
        assert!(matches!(err, BerthError::Unauthorized { .. }));
        assert_eq!(
            f.store.get(&record.id).expect("get").status,
            RentalStatus::Active
        );
    }

    #[test]
    fn save_tolerates_vanished_container() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let approved = f.machine.approve_rental(&record.id).expect("approve");
        let handle = approved.container_ref.expect("handle");
        f.runtime.vanish(&handle).expect("vanish");

        let saved = f.machine.save_rental(&record.id, &alice()).expect("save");
        assert_eq!(saved.status, RentalStatus::Saved);
    }

    #[test]
    fn save_from_pending_is_invalid_transition() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let err = f.machine.save_rental(&record.id, &alice()).unwrap_err();
        assert!(matches!(err, BerthError::InvalidTransition { .. }));
        assert_eq!(
            f.store.get(&record.id).expect("get").status,
            RentalStatus::Pending
        );
    }

    #[test]
    fn restore_acknowledges_saved_rental_without_creating_container() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        let _ = f.machine.save_rental(&record.id, &alice()).expect("save");

        let before = f.store.get(&record.id).expect("get");
        let receipt = f.machine.restore_rental(&record.id, &alice()).expect("restore");
        assert_eq!(receipt.status, RentalStatus::Saved);
        assert_eq!(f.runtime.len().expect("len"), 1);

        let after = f.store.get(&record.id).expect("get");
        assert_eq!(after.status, RentalStatus::Saved);
        assert_eq!(after.version, before.version + 1);
    }

    #[test]
    fn restore_from_active_is_invalid_transition() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        let err = f.machine.restore_rental(&record.id, &alice()).unwrap_err();
        assert!(matches!(err, BerthError::InvalidTransition { .. }));
    }

    #[test]
    fn discard_removes_container_and_clears_handle() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");

        let discarded = f
            .machine
            .discard_rental(&record.id, &alice(), false)
            .expect("discard");
        assert_eq!(discarded.status, RentalStatus::Discarded);
        assert!(discarded.container_ref.is_none());
        assert!(discarded.ref_matches_status());
        assert_eq!(f.runtime.len().expect("len"), 0);
    }

    #[test]
    fn discard_twice_is_invalid_transition() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        let _ = f
            .machine
            .discard_rental(&record.id, &alice(), false)
            .expect("first discard");

        let err = f
            .machine
            .discard_rental(&record.id, &alice(), false)
            .unwrap_err();
        assert!(matches!(err, BerthError::InvalidTransition { .. }));
        assert_eq!(
            f.store.get(&record.id).expect("get").status,
            RentalStatus::Discarded
        );
        assert_eq!(f.runtime.len().expect("len"), 0);
    }

    #[test]
    fn admin_can_discard_foreign_rental() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");

        let discarded = f
            .machine
            .discard_rental(&record.id, &UserId::new("admin"), true)
            .expect("admin discard");
        assert_eq!(discarded.status, RentalStatus::Discarded);
    }

    #[test]
    fn stop_container_demotes_active_record() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let approved = f.machine.approve_rental(&record.id).expect("approve");
        let handle = approved.container_ref.expect("handle");

        let stopped = f
            .machine
            .stop_container(&handle)
            .expect("stop")
            .expect("record found");
        assert_eq!(stopped.status, RentalStatus::Stopped);
        assert_eq!(
            f.runtime.inspect(&handle).expect("inspect"),
            RuntimeStatus::Stopped
        );
    }

    #[test]
    fn stop_container_without_record_still_stops() {
        let f = fixture();
        let handle = f.runtime.create("stray").expect("create");
        let outcome = f.machine.stop_container(&handle).expect("stop");
        assert!(outcome.is_none());
        assert_eq!(
            f.runtime.inspect(&handle).expect("inspect"),
            RuntimeStatus::Stopped
        );
    }

    #[test]
    fn stop_container_unknown_handle_is_not_found() {
        let f = fixture();
        let err = f.machine.stop_container(&RuntimeRef::new("ghost")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_container_discards_owning_record() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let approved = f.machine.approve_rental(&record.id).expect("approve");
        let handle = approved.container_ref.expect("handle");

        let discarded = f
            .machine
            .delete_container(&handle)
            .expect("delete")
            .expect("record found");
        assert_eq!(discarded.status, RentalStatus::Discarded);
        assert_eq!(f.runtime.len().expect("len"), 0);
    }

    #[test]
    fn delete_container_repairs_record_when_engine_lost_it() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let approved = f.machine.approve_rental(&record.id).expect("approve");
        let handle = approved.container_ref.expect("handle");
        f.runtime.vanish(&handle).expect("vanish");

        let discarded = f
            .machine
            .delete_container(&handle)
            .expect("delete")
            .expect("record found");
        assert_eq!(discarded.status, RentalStatus::Discarded);
    }

    #[test]
    fn delete_container_unknown_everywhere_is_not_found() {
        let f = fixture();
        let err = f
            .machine
            .delete_container(&RuntimeRef::new("ghost"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn listings_follow_statuses() {
        let f = fixture();
        let pending = f.machine.request_rental(&alice(), "nginx").expect("request");
        let saved = f.machine.request_rental(&alice(), "redis").expect("request");
        let _ = f.machine.approve_rental(&saved.id).expect("approve");
        let _ = f.machine.save_rental(&saved.id, &alice()).expect("save");

        let pending_ids: Vec<_> = f
            .machine
            .list_pending()
            .expect("pending")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(pending_ids, vec![pending.id.clone()]);

        let saved_ids: Vec<_> = f
            .machine
            .list_saved()
            .expect("saved")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(saved_ids, vec![saved.id.clone()]);

        let mine: Vec<_> = f
            .machine
            .my_servers(&alice())
            .expect("mine")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert!(mine.contains(&pending.id));
        assert!(mine.contains(&saved.id));
    }

    #[test]
    fn my_servers_excludes_discarded() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        let _ = f
            .machine
            .discard_rental(&record.id, &alice(), false)
            .expect("discard");

        let mine = f.machine.my_servers(&alice()).expect("mine");
        assert!(mine.iter().all(|r| r.id != record.id));
    }

    #[test]
    fn every_operation_keeps_ref_status_coupling() {
        let f = fixture();
        let record = f.machine.request_rental(&alice(), "nginx").expect("request");
        let check = |id: &RentalId| {
            let r = f.store.get(id).expect("get");
            assert!(r.ref_matches_status(), "coupling broken in {}", r.status);
        };

        check(&record.id);
        let _ = f.machine.approve_rental(&record.id).expect("approve");
        check(&record.id);
        let _ = f.machine.save_rental(&record.id, &alice()).expect("save");
        check(&record.id);
        let _ = f.machine.restore_rental(&record.id, &alice()).expect("restore");
        check(&record.id);
        let _ = f
            .machine
            .discard_rental(&record.id, &alice(), false)
            .expect("discard");
        check(&record.id);
    }
}
