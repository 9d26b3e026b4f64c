//! Domain primitive types used across the Berth workspace.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a rental record.
///
/// Assigned at creation and immutable. Exposed to callers as an opaque
/// string; never interchangeable with a [`RuntimeRef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentalId(String);

impl RentalId {
    /// Creates a rental ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random rental ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle identifying a container inside the container engine.
///
/// Distinct from [`RentalId`]; a record carries both and no interface
/// accepts one where the other is meant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeRef(String);

impl RuntimeRef {
    /// Creates a runtime ref from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random runtime ref (in-process backends only).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuntimeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user owning rentals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID from a string value, trimming surrounding
    /// whitespace.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a rental record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    /// Requested by a user, awaiting admin decision.
    Pending,
    /// Approved; a runtime container is running for it.
    Active,
    /// Declined by an admin. Terminal.
    Rejected,
    /// Snapshotted by the user; container stopped but kept.
    Saved,
    /// Force-stopped by an admin; container stopped but kept.
    Stopped,
    /// Released; container removed. Terminal.
    Discarded,
}

impl RentalStatus {
    /// Whether a runtime container backs this status.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Saved | Self::Stopped)
    }

    /// Whether no further transition is allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Discarded)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Rejected => write!(f, "rejected"),
            Self::Saved => write!(f, "saved"),
            Self::Stopped => write!(f, "stopped"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

/// Persistent record of one user's container lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRecord {
    /// Unique identifier, assigned at creation.
    pub id: RentalId,
    /// Owning user.
    pub user_id: UserId,
    /// Container image reference requested.
    pub image: String,
    /// Runtime handle; present exactly when `status` is live.
    pub container_ref: Option<RuntimeRef>,
    /// Current lifecycle status.
    pub status: RentalStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last transition.
    pub updated_at: DateTime<Utc>,
    /// Monotonic counter for optimistic concurrency.
    pub version: u64,
}

impl RentalRecord {
    /// Creates a fresh record in the `Pending` status.
    #[must_use]
    pub fn new(user_id: UserId, image: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RentalId::generate(),
            user_id,
            image: image.into().trim().to_string(),
            container_ref: None,
            status: RentalStatus::Pending,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Whether the record satisfies the ref/status coupling: a runtime
    /// handle is set exactly when the status is runtime-backed.
    #[must_use]
    pub const fn ref_matches_status(&self) -> bool {
        self.container_ref.is_some() == self.status.is_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_pending_without_ref() {
        let r = RentalRecord::new(UserId::new("alice"), "nginx");
        assert_eq!(r.status, RentalStatus::Pending);
        assert!(r.container_ref.is_none());
        assert_eq!(r.version, 1);
        assert!(r.ref_matches_status());
    }

    #[test]
    fn new_record_trims_image() {
        let r = RentalRecord::new(UserId::new(" alice "), "  nginx \n");
        assert_eq!(r.image, "nginx");
        assert_eq!(r.user_id.as_str(), "alice");
    }

    #[test]
    fn live_statuses_require_ref() {
        assert!(RentalStatus::Active.is_live());
        assert!(RentalStatus::Saved.is_live());
        assert!(RentalStatus::Stopped.is_live());
        assert!(!RentalStatus::Pending.is_live());
        assert!(!RentalStatus::Rejected.is_live());
        assert!(!RentalStatus::Discarded.is_live());
    }

    #[test]
    fn terminal_statuses() {
        assert!(RentalStatus::Rejected.is_terminal());
        assert!(RentalStatus::Discarded.is_terminal());
        assert!(!RentalStatus::Saved.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&RentalStatus::Pending).expect("serialize");
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn rental_id_and_runtime_ref_display_opaquely() {
        let id = RentalId::new("abc-123");
        let re = RuntimeRef::new("deadbeef");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(re.to_string(), "deadbeef");
    }
}
