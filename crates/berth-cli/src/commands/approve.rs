//! `berth approve` — Approve a pending rental request.

use berth_common::types::RentalId;
use clap::Args;

use super::Context;

/// Arguments for the `approve` command.
#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Rental id to approve.
    pub id: String,
}

/// Executes the `approve` command.
///
/// # Errors
///
/// Returns an error if the rental is not pending, the engine cannot
/// create the container, or the approval lost a race.
pub fn execute(ctx: &Context, args: ApproveArgs) -> anyhow::Result<()> {
    let record = ctx
        .machine
        .approve_rental(&RentalId::new(args.id.trim()))
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let handle = record
        .container_ref
        .as_ref()
        .map_or("-", |c| c.as_str());
    println!(
        "Rental {} approved; container {} running for {}.",
        record.id, handle, record.user_id
    );
    Ok(())
}
