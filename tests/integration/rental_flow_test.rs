//! Integration tests for the rental lifecycle and reconciler.
//!
//! These tests are implemented in:
//! `crates/berth-rental/tests/rental_flow.rs`
//!
//! Covered scenarios:
//! - `full_lifecycle_request_approve_save_discard`: request → approve →
//!   save → discard with the container observed at every step
//! - `racing_approvals_leave_exactly_one_container`: two concurrent
//!   approvals, one winner, loser compensated
//! - `lost_approval_write_compensates_the_fresh_container`: saga
//!   compensation after a lost conditional write
//! - `failed_compensation_is_a_partial_failure_the_reconciler_flags`
//! - `json_store_backs_the_same_lifecycle`: file-backed store roundtrip
//! - `reconciler_heals_a_vanished_container_end_to_end`
