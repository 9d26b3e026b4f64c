//! `berth containers` — List the engine's full container inventory.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `containers` command.
#[derive(Args, Debug)]
pub struct ContainersArgs {}

/// Executes the `containers` command.
///
/// # Errors
///
/// Returns an error if the engine cannot be queried.
pub fn execute(ctx: &Context, _args: ContainersArgs) -> anyhow::Result<()> {
    let containers = ctx
        .machine
        .list_all_containers()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    output::print_containers(&containers);
    Ok(())
}
