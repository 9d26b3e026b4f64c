//! `berth rm` — Force-remove a container by its runtime handle.

use berth_common::types::RuntimeRef;
use clap::Args;

use super::Context;

/// Arguments for the `rm` command.
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Runtime handle of the container to remove.
    pub container: String,
}

/// Executes the `rm` command.
///
/// # Errors
///
/// Returns an error if neither the engine nor the store knows the handle.
pub fn execute(ctx: &Context, args: RmArgs) -> anyhow::Result<()> {
    let handle = RuntimeRef::new(args.container.trim());
    let outcome = ctx
        .machine
        .delete_container(&handle)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    match outcome {
        Some(record) => println!(
            "Container {handle} removed; rental {} discarded.",
            record.id
        ),
        None => println!("Container {handle} removed; no owning rental record."),
    }
    Ok(())
}
