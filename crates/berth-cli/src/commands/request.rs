//! `berth request` — File a rental request for a user.

use berth_common::types::UserId;
use clap::Args;

use super::Context;

/// Arguments for the `request` command.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// User requesting the rental.
    pub user: String,

    /// Container image to rent.
    pub image: String,
}

/// Executes the `request` command.
///
/// # Errors
///
/// Returns an error if the image is empty or the user is unknown.
pub fn execute(ctx: &Context, args: RequestArgs) -> anyhow::Result<()> {
    let record = ctx
        .machine
        .request_rental(&UserId::new(args.user), &args.image)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!(
        "Rental {} requested for {}; awaiting admin approval.",
        record.id, record.user_id
    );
    Ok(())
}
