//! # berth-rental
//!
//! The Berth core: a state machine over rental records plus the
//! reconciler that keeps those records convergent with the container
//! engine's actual inventory.
//!
//! Both components are constructed from injected trait objects
//! ([`RentalStore`](berth_store::RentalStore),
//! [`ContainerRuntime`](berth_runtime::ContainerRuntime),
//! [`Identity`](identity::Identity)) so every collaborator can be faked
//! in tests and swapped per environment.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod identity;
pub mod machine;
pub mod reconciler;

pub use identity::{Identity, StaticRegistry};
pub use machine::{RentalStateMachine, RestoreReceipt};
pub use reconciler::{ReconcileReport, Reconciler};
