//! `berth stop` — Force-stop a container by its runtime handle.

use berth_common::types::RuntimeRef;
use clap::Args;

use super::Context;

/// Arguments for the `stop` command.
#[derive(Args, Debug)]
pub struct StopArgs {
    /// Runtime handle of the container to stop.
    pub container: String,
}

/// Executes the `stop` command.
///
/// # Errors
///
/// Returns an error if the engine does not know the handle.
pub fn execute(ctx: &Context, args: StopArgs) -> anyhow::Result<()> {
    let handle = RuntimeRef::new(args.container.trim());
    let outcome = ctx
        .machine
        .stop_container(&handle)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    match outcome {
        Some(record) => println!(
            "Container {handle} stopped; rental {} is now {}.",
            record.id, record.status
        ),
        None => println!("Container {handle} stopped; no owning rental record."),
    }
    Ok(())
}
