//! `berth save` — Snapshot an active rental.

use berth_common::types::{RentalId, UserId};
use clap::Args;

use super::Context;

/// Arguments for the `save` command.
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Rental id to save.
    pub id: String,

    /// Acting user (must own the rental).
    #[arg(long)]
    pub user: String,
}

/// Executes the `save` command.
///
/// # Errors
///
/// Returns an error if the caller does not own the rental or it is not
/// active.
pub fn execute(ctx: &Context, args: SaveArgs) -> anyhow::Result<()> {
    let record = ctx
        .machine
        .save_rental(&RentalId::new(args.id.trim()), &UserId::new(args.user))
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("Rental {} saved; container stopped.", record.id);
    Ok(())
}
