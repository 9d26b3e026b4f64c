//! CLI command definitions and dispatch.

pub mod approve;
pub mod containers;
pub mod discard;
pub mod pending;
pub mod reconcile;
pub mod reject;
pub mod request;
pub mod restore;
pub mod rm;
pub mod save;
pub mod saved;
pub mod servers;
pub mod stop;

use std::path::PathBuf;
use std::sync::Arc;

use berth_common::config::{BerthConfig, RuntimeKind};
use berth_rental::{Identity, Reconciler, RentalStateMachine, StaticRegistry};
use berth_runtime::{ContainerRuntime, DockerCliBackend, MemoryBackend};
use berth_store::{JsonStore, RentalStore};
use clap::{Parser, Subcommand};

/// Berth — container rental on shared infrastructure.
#[derive(Parser, Debug)]
#[command(name = "berth", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the rental store index file.
    #[arg(long, global = true, default_value_t = berth_common::constants::default_store_file())]
    pub store_file: String,

    /// Path to the user registry file.
    #[arg(long, global = true, default_value_t = berth_common::constants::default_users_file())]
    pub users_file: String,

    /// Use the in-process container backend instead of docker.
    #[arg(long, global = true)]
    pub memory_runtime: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// File a rental request for a user.
    Request(request::RequestArgs),
    /// List requests awaiting an admin decision.
    Pending(pending::PendingArgs),
    /// Approve a pending request (admin).
    Approve(approve::ApproveArgs),
    /// Reject a pending request (admin).
    Reject(reject::RejectArgs),
    /// List saved rentals (admin).
    Saved(saved::SavedArgs),
    /// Snapshot an active rental.
    Save(save::SaveArgs),
    /// Request a restore of a saved or stopped rental.
    Restore(restore::RestoreArgs),
    /// Release a rental and remove its container.
    Discard(discard::DiscardArgs),
    /// List the engine's full container inventory (admin).
    Containers(containers::ContainersArgs),
    /// Force-stop a container by its runtime handle (admin).
    Stop(stop::StopArgs),
    /// Force-remove a container by its runtime handle (admin).
    Rm(rm::RmArgs),
    /// Run the reconciler, once or on an interval.
    Reconcile(reconcile::ReconcileArgs),
}

/// Collaborators wired from the global flags.
pub struct Context {
    /// The rental state machine.
    pub machine: RentalStateMachine,
    /// The store/engine reconciler.
    pub reconciler: Reconciler,
    /// The effective configuration the collaborators were built from.
    pub config: BerthConfig,
}

/// Resolves the effective configuration from defaults and global flags.
fn resolve_config(cli: &Cli) -> BerthConfig {
    BerthConfig {
        store_file: PathBuf::from(&cli.store_file),
        users_file: PathBuf::from(&cli.users_file),
        runtime: if cli.memory_runtime {
            RuntimeKind::Memory
        } else {
            RuntimeKind::Docker
        },
        ..BerthConfig::default()
    }
}

/// Builds the store, runtime, and identity collaborators and wires the
/// core components around them.
fn build_context(cli: &Cli) -> anyhow::Result<Context> {
    let config = resolve_config(cli);
    let store: Arc<dyn RentalStore> = Arc::new(JsonStore::new(&config.store_file));

    let runtime: Arc<dyn ContainerRuntime> = match config.runtime {
        RuntimeKind::Memory => Arc::new(MemoryBackend::new()),
        RuntimeKind::Docker => {
            let backend = DockerCliBackend::with_stop_grace(config.stop_grace_secs);
            if !backend.is_available() {
                tracing::warn!("docker binary not found on PATH; engine calls will fail");
            }
            Arc::new(backend)
        }
    };

    let identity: Arc<dyn Identity> = if config.users_file.exists() {
        Arc::new(
            StaticRegistry::from_file(&config.users_file).map_err(|e| anyhow::anyhow!("{e}"))?,
        )
    } else {
        tracing::warn!(path = %config.users_file.display(), "no user registry file; accepting any user id");
        Arc::new(StaticRegistry::permissive())
    };

    Ok(Context {
        machine: RentalStateMachine::new(store.clone(), runtime.clone(), identity),
        reconciler: Reconciler::new(store, runtime),
        config,
    })
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let ctx = build_context(&cli)?;
    match cli.command {
        Command::Request(args) => request::execute(&ctx, args),
        Command::Pending(args) => pending::execute(&ctx, args),
        Command::Approve(args) => approve::execute(&ctx, args),
        Command::Reject(args) => reject::execute(&ctx, args),
        Command::Saved(args) => saved::execute(&ctx, args),
        Command::Save(args) => save::execute(&ctx, args),
        Command::Restore(args) => restore::execute(&ctx, args),
        Command::Discard(args) => discard::execute(&ctx, args),
        Command::Containers(args) => containers::execute(&ctx, args),
        Command::Stop(args) => stop::execute(&ctx, args),
        Command::Rm(args) => rm::execute(&ctx, args),
        Command::Reconcile(args) => reconcile::execute(&ctx, args),
    }
}
