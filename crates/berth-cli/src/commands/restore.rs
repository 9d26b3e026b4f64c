//! `berth restore` — Request a restore of a saved or stopped rental.

use berth_common::types::{RentalId, UserId};
use clap::Args;

use super::Context;

/// Arguments for the `restore` command.
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Rental id to restore.
    pub id: String,

    /// Acting user (must own the rental).
    #[arg(long)]
    pub user: String,
}

/// Executes the `restore` command.
///
/// # Errors
///
/// Returns an error if the caller does not own the rental or it is not
/// saved or stopped.
pub fn execute(ctx: &Context, args: RestoreArgs) -> anyhow::Result<()> {
    let receipt = ctx
        .machine
        .restore_rental(&RentalId::new(args.id.trim()), &UserId::new(args.user))
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!(
        "Restore of rental {} requested at {}; awaiting admin approval.",
        receipt.rental, receipt.requested_at
    );
    Ok(())
}
