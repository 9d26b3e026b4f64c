//! `berth saved` — List saved rentals.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `saved` command.
#[derive(Args, Debug)]
pub struct SavedArgs {}

/// Executes the `saved` command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(ctx: &Context, _args: SavedArgs) -> anyhow::Result<()> {
    let records = ctx
        .machine
        .list_saved()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    output::print_records(&records);
    Ok(())
}
