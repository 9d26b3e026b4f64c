//! Divergence detection and repair between store and engine.
//!
//! Records and containers mutate independently: a container can die
//! outside the state machine's control, an approval can lose its store
//! write after the container exists, an admin can remove a container by
//! hand. One reconciler pass reads both sides, repairs the record side
//! (the engine is ground truth for "is it running"), and reports
//! containers no record owns so an admin can reclaim them.
//!
//! The reconciler writes only the store; unowned containers are reported,
//! never removed here.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use berth_common::error::{BerthError, Result};
use berth_common::types::{RentalId, RentalStatus, RuntimeRef};
use berth_runtime::{ContainerRuntime, RuntimeStatus};
use berth_store::{RecordPatch, RentalFilter, RentalStore};

/// What one reconciler pass found and repaired.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Records whose container vanished; transitioned to `discarded`.
    pub orphaned: Vec<RentalId>,
    /// `active` records whose container the engine reports stopped;
    /// transitioned to `stopped`.
    pub demoted: Vec<RentalId>,
    /// Containers no record owns; left for administrative cleanup.
    pub unowned: Vec<RuntimeRef>,
}

impl ReconcileReport {
    /// Whether the pass performed no store writes. Unowned containers do
    /// not count: reporting them is read-only and repeats every pass
    /// until an admin reclaims them.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.orphaned.is_empty() && self.demoted.is_empty()
    }
}

/// Periodic (or on-demand) repair loop over store and engine.
pub struct Reconciler {
    store: Arc<dyn RentalStore>,
    runtime: Arc<dyn ContainerRuntime>,
}

impl Reconciler {
    /// Creates a reconciler over the given collaborators.
    #[must_use]
    pub fn new(store: Arc<dyn RentalStore>, runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { store, runtime }
    }

    /// Runs one full pass. Idempotent: a second pass with no intervening
    /// change performs no writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine inventory or the store cannot be
    /// read. Individual record repairs that lose a race are skipped with
    /// a warning; the next pass retries them.
    pub fn run_once(&self) -> Result<ReconcileReport> {
        let inventory = self.runtime.list()?;
        let by_ref: HashMap<RuntimeRef, RuntimeStatus> =
            inventory.iter().map(|c| (c.id.clone(), c.status)).collect();

        let records = self.store.find(&RentalFilter {
            has_container_ref: Some(true),
            ..RentalFilter::default()
        })?;

        let mut report = ReconcileReport::default();
        let mut owned: HashSet<RuntimeRef> = HashSet::new();

        for record in records {
            let Some(handle) = record.container_ref.clone() else {
                continue;
            };
            let _ = owned.insert(handle.clone());

            match by_ref.get(&handle) {
                None => {
                    tracing::warn!(
                        id = %record.id,
                        container = %handle,
                        status = %record.status,
                        "container vanished; discarding record"
                    );
                    if self.repair(
                        &record.id,
                        record.version,
                        RecordPatch {
                            status: RentalStatus::Discarded,
                            container_ref: None,
                        },
                    )? {
                        report.orphaned.push(record.id.clone());
                    }
                }
                Some(RuntimeStatus::Stopped) if record.status == RentalStatus::Active => {
                    tracing::warn!(
                        id = %record.id,
                        container = %handle,
                        "engine reports container stopped; demoting active record"
                    );
                    if self.repair(
                        &record.id,
                        record.version,
                        RecordPatch {
                            status: RentalStatus::Stopped,
                            container_ref: Some(handle),
                        },
                    )? {
                        report.demoted.push(record.id.clone());
                    }
                }
                Some(RuntimeStatus::Running) if record.status != RentalStatus::Active => {
                    // No lawful edge brings saved/stopped back to active
                    // here; flag it for an operator instead of guessing.
                    tracing::warn!(
                        id = %record.id,
                        container = %handle,
                        status = %record.status,
                        "container running behind a non-active record"
                    );
                }
                Some(_) => {}
            }
        }

        for container in inventory {
            if !owned.contains(&container.id) {
                tracing::warn!(
                    container = %container.id,
                    image = %container.image,
                    "container has no owning record; flagging for cleanup"
                );
                report.unowned.push(container.id);
            }
        }

        tracing::info!(
            orphaned = report.orphaned.len(),
            demoted = report.demoted.len(),
            unowned = report.unowned.len(),
            "reconcile pass complete"
        );
        Ok(report)
    }

    /// Runs passes on a fixed interval until `stop` is set. Pass
    /// failures are logged and the loop keeps going.
    pub fn run_every(&self, interval: Duration, stop: &AtomicBool) {
        while !stop.load(Ordering::SeqCst) {
            if let Err(e) = self.run_once() {
                tracing::error!(error = %e, "reconcile pass failed");
            }
            // Sleep in short slices so a stop request is noticed promptly.
            let mut remaining = interval;
            while !remaining.is_zero() && !stop.load(Ordering::SeqCst) {
                let slice = remaining.min(Duration::from_millis(250));
                std::thread::sleep(slice);
                remaining = remaining.saturating_sub(slice);
            }
        }
    }

    /// Applies one repair write; a lost race is skipped, not fatal.
    fn repair(&self, id: &RentalId, expected_version: u64, patch: RecordPatch) -> Result<bool> {
        match self.store.conditional_update(id, expected_version, patch) {
            Ok(_) => Ok(true),
            Err(BerthError::Conflict { .. }) => {
                tracing::warn!(id = %id, "record moved during reconcile; retrying next pass");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
