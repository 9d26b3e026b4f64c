//! `berth servers` — List a user's own rentals.

use berth_common::types::UserId;
use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `servers` command.
#[derive(Args, Debug)]
pub struct ServersArgs {
    /// User whose rentals to list.
    pub user: String,
}

/// Executes the `servers` command.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(ctx: &Context, args: ServersArgs) -> anyhow::Result<()> {
    let records = ctx
        .machine
        .my_servers(&UserId::new(args.user))
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    output::print_records(&records);
    Ok(())
}
