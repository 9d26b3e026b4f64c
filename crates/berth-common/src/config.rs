//! Global configuration model for the Berth service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which container engine backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// Delegate to the local `docker` binary.
    Docker,
    /// In-process inventory, no real containers (tests and development).
    Memory,
}

/// Root configuration for the Berth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BerthConfig {
    /// Path to the rental store index file.
    pub store_file: PathBuf,
    /// Path to the user registry file.
    pub users_file: PathBuf,
    /// Container engine backend selection.
    pub runtime: RuntimeKind,
    /// Grace period in seconds for container stops.
    pub stop_grace_secs: u64,
    /// Interval in seconds between reconciler passes in watch mode.
    pub reconcile_interval_secs: u64,
}

impl Default for BerthConfig {
    fn default() -> Self {
        Self {
            store_file: PathBuf::from(crate::constants::default_store_file()),
            users_file: PathBuf::from(crate::constants::default_users_file()),
            runtime: RuntimeKind::Docker,
            stop_grace_secs: crate::constants::STOP_GRACE_SECS,
            reconcile_interval_secs: crate::constants::RECONCILE_INTERVAL_SECS,
        }
    }
}
