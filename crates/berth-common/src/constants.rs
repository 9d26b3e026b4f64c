//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Default base directory for Berth data on Linux with root access.
pub const SYSTEM_DATA_DIR: &str = "/var/lib/berth";

/// Returns the data directory, preferring `$HOME/.berth` for non-root
/// or non-Linux environments, falling back to `/var/lib/berth`.
fn resolve_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        let user_dir = PathBuf::from(home).join(".berth");
        if std::fs::create_dir_all(&user_dir).is_ok() {
            return user_dir;
        }
    }
    PathBuf::from(SYSTEM_DATA_DIR)
}

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the resolved data directory for this session.
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(resolve_data_dir)
}

/// Returns the default rental store file path.
pub fn default_store_file() -> String {
    data_dir().join("rentals.json").to_string_lossy().into_owned()
}

/// Returns the default user registry file path.
pub fn default_users_file() -> String {
    data_dir().join("users.json").to_string_lossy().into_owned()
}

/// Maximum number of records returned by a store query.
pub const LIST_LIMIT: usize = 100;

/// Grace period (seconds) given to a container on stop before the
/// engine kills it.
pub const STOP_GRACE_SECS: u64 = 10;

/// Default interval between reconciler passes in watch mode.
pub const RECONCILE_INTERVAL_SECS: u64 = 60;

/// Application name used in CLI output and state files.
pub const APP_NAME: &str = "berth";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "berth";
