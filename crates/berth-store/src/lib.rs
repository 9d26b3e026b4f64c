//! Durable rental record repository for the Berth service.
//!
//! Defines the [`RentalStore`](store::RentalStore) trait consumed by the
//! state machine and reconciler, plus two backends: an in-process map and
//! a JSON index file.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod json;
pub mod memory;
pub mod store;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use store::{RecordPatch, RentalFilter, RentalStore};
