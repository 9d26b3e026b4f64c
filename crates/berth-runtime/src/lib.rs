//! Container engine abstraction for the Berth service.
//!
//! The state machine and reconciler only ever see the
//! [`ContainerRuntime`](runtime::ContainerRuntime) trait; the concrete
//! engine is injected at construction.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod docker;
pub mod memory;
pub mod runtime;

pub use docker::DockerCliBackend;
pub use memory::MemoryBackend;
pub use runtime::{ContainerRuntime, RuntimeContainer, RuntimeStatus};
