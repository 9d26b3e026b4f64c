//! In-process container backend.
//!
//! Keeps the inventory in a mutex-guarded map and runs no real
//! containers. Used by tests and by local development against the
//! `--memory-runtime` CLI flag.

use std::collections::HashMap;
use std::sync::Mutex;

use berth_common::error::{BerthError, Result};
use berth_common::types::RuntimeRef;

use crate::runtime::{ContainerRuntime, RuntimeContainer, RuntimeStatus};

#[derive(Debug, Clone)]
struct Entry {
    image: String,
    status: RuntimeStatus,
}

/// Backend whose whole engine is one in-memory map.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    containers: Mutex<HashMap<RuntimeRef, Entry>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently tracked, stopped ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether no containers are tracked.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Drops a container from the inventory without going through
    /// [`ContainerRuntime::remove`], simulating a container vanishing
    /// outside the state machine's control.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory lock is poisoned.
    pub fn vanish(&self, id: &RuntimeRef) -> Result<()> {
        let _ = self.lock()?.remove(id);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<RuntimeRef, Entry>>> {
        self.containers.lock().map_err(|_| BerthError::Runtime {
            message: "inventory lock poisoned".into(),
        })
    }
}

impl ContainerRuntime for MemoryBackend {
    fn create(&self, image: &str) -> Result<RuntimeRef> {
        if image.trim().is_empty() {
            return Err(BerthError::Runtime {
                message: "cannot create container from empty image".into(),
            });
        }
        let id = RuntimeRef::generate();
        let _ = self.lock()?.insert(
            id.clone(),
            Entry {
                image: image.to_string(),
                status: RuntimeStatus::Running,
            },
        );
        tracing::info!(id = %id, image, "container created (memory)");
        Ok(id)
    }

    fn stop(&self, id: &RuntimeRef) -> Result<()> {
        let mut containers = self.lock()?;
        let entry = containers.get_mut(id).ok_or_else(|| BerthError::NotFound {
            kind: "container",
            id: id.to_string(),
        })?;
        entry.status = RuntimeStatus::Stopped;
        tracing::info!(id = %id, "container stopped (memory)");
        Ok(())
    }

    fn remove(&self, id: &RuntimeRef) -> Result<()> {
        let mut containers = self.lock()?;
        if containers.remove(id).is_none() {
            return Err(BerthError::NotFound {
                kind: "container",
                id: id.to_string(),
            });
        }
        tracing::info!(id = %id, "container removed (memory)");
        Ok(())
    }

    fn inspect(&self, id: &RuntimeRef) -> Result<RuntimeStatus> {
        let containers = self.lock()?;
        containers
            .get(id)
            .map(|e| e.status)
            .ok_or_else(|| BerthError::NotFound {
                kind: "container",
                id: id.to_string(),
            })
    }

    fn list(&self) -> Result<Vec<RuntimeContainer>> {
        let containers = self.lock()?;
        Ok(containers
            .iter()
            .map(|(id, e)| RuntimeContainer {
                id: id.clone(),
                image: e.image.clone(),
                status: e.status,
            })
            .collect())
    }

    fn is_available(&self) -> bool {
        true
    }
}
