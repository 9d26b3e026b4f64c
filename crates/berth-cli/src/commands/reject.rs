//! `berth reject` — Reject a pending rental request.

use berth_common::types::RentalId;
use clap::Args;

use super::Context;

/// Arguments for the `reject` command.
#[derive(Args, Debug)]
pub struct RejectArgs {
    /// Rental id to reject.
    pub id: String,
}

/// Executes the `reject` command.
///
/// # Errors
///
/// Returns an error if the rental is not pending.
pub fn execute(ctx: &Context, args: RejectArgs) -> anyhow::Result<()> {
    let record = ctx
        .machine
        .reject_rental(&RentalId::new(args.id.trim()))
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("Rental {} rejected.", record.id);
    Ok(())
}
