//! `berth pending` — List requests awaiting an admin decision.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `pending` command.
#[derive(Args, Debug)]
pub struct PendingArgs {}

/// Executes the `pending` command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(ctx: &Context, _args: PendingArgs) -> anyhow::Result<()> {
    let records = ctx
        .machine
        .list_pending()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    output::print_records(&records);
    Ok(())
}
