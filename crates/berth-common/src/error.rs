//! Unified error types for the Berth workspace.
//!
//! Every crate reports failures through [`BerthError`]; the variants map to
//! the caller-facing taxonomy so callers can tell apart "retry is safe"
//! from "retry is pointless".

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RentalStatus;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BerthError {
    /// A rental record or runtime container was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The requested operation is not valid from the record's current status.
    #[error("cannot {action} rental {id} while {from}")]
    InvalidTransition {
        /// Rental this was attempted on.
        id: String,
        /// Status the record held at read time.
        from: RentalStatus,
        /// Operation that was attempted.
        action: &'static str,
    },

    /// An optimistic write lost a race against a concurrent mutation.
    #[error("conflicting update on rental {id}: {message}")]
    Conflict {
        /// Rental the write targeted.
        id: String,
        /// Description of the stale expectation.
        message: String,
    },

    /// The acting user does not own the record or lacks privilege.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Description of the denied access.
        message: String,
    },

    /// The container engine call failed for a reason other than not-found.
    #[error("container runtime error: {message}")]
    Runtime {
        /// Description of the engine failure.
        message: String,
    },

    /// A compensating runtime call failed after a store/runtime mismatch;
    /// store and runtime disagree until the next reconciler pass.
    #[error("partial failure on rental {rental} (container {container}): {message}")]
    PartialFailure {
        /// Rental whose record could not be brought back in line.
        rental: String,
        /// Runtime handle left dangling.
        container: String,
        /// Description of the failed compensation.
        message: String,
    },

    /// Malformed caller input.
    #[error("invalid input: {message}")]
    Validation {
        /// Description of the invalid input.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl BerthError {
    /// Whether this error reports an absent resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether retrying the failed operation can succeed.
    ///
    /// Lost races and engine hiccups are transient; a bad transition, a
    /// privilege failure, or a missing resource will fail the same way
    /// every time.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Runtime { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BerthError>;
