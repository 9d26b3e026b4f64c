//! `berth discard` — Release a rental and remove its container.

use berth_common::types::{RentalId, UserId};
use clap::Args;

use super::Context;

/// Arguments for the `discard` command.
#[derive(Args, Debug)]
pub struct DiscardArgs {
    /// Rental id to discard.
    pub id: String,

    /// Acting user.
    #[arg(long)]
    pub user: String,

    /// Act with admin privilege (bypasses the ownership check).
    #[arg(long)]
    pub admin: bool,
}

/// Executes the `discard` command.
///
/// # Errors
///
/// Returns an error if the caller may not discard the rental or it has
/// no runtime container.
pub fn execute(ctx: &Context, args: DiscardArgs) -> anyhow::Result<()> {
    let record = ctx
        .machine
        .discard_rental(
            &RentalId::new(args.id.trim()),
            &UserId::new(args.user),
            args.admin,
        )
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("Rental {} discarded; container removed.", record.id);
    Ok(())
}
