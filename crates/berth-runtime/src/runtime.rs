//! Engine-agnostic container runtime trait.

use std::fmt;

use berth_common::error::Result;
use berth_common::types::RuntimeRef;

/// Observed state of a container inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStatus {
    /// The container process is up.
    Running,
    /// The container exists but its process is not running.
    Stopped,
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// One entry of the engine's inventory.
#[derive(Debug, Clone)]
pub struct RuntimeContainer {
    /// Engine handle.
    pub id: RuntimeRef,
    /// Image the container was created from.
    pub image: String,
    /// Observed state.
    pub status: RuntimeStatus,
}

/// Abstraction over the container engine.
///
/// Absence of a container is reported as an error whose
/// [`is_not_found`](berth_common::error::BerthError::is_not_found) is
/// true; callers decide whether absence is tolerable for their operation.
/// All calls are blocking I/O and must run to completion once issued.
pub trait ContainerRuntime: Send + Sync {
    /// Creates and starts a container from `image`, returning its handle.
    ///
    /// # Errors
    ///
    /// Returns `Runtime` if the engine cannot create the container.
    fn create(&self, image: &str) -> Result<RuntimeRef>;

    /// Stops a running container.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the engine does not know the handle,
    /// `Runtime` for any other engine failure.
    fn stop(&self, id: &RuntimeRef) -> Result<()>;

    /// Force-removes a container, running or not.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the engine does not know the handle,
    /// `Runtime` for any other engine failure.
    fn remove(&self, id: &RuntimeRef) -> Result<()>;

    /// Reports the observed state of one container.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the engine does not know the handle.
    fn inspect(&self, id: &RuntimeRef) -> Result<RuntimeStatus>;

    /// Lists the engine's full inventory, stopped containers included.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory cannot be retrieved.
    fn list(&self) -> Result<Vec<RuntimeContainer>>;

    /// Returns whether this backend is operational on the current host.
    fn is_available(&self) -> bool;
}
