//! `berth reconcile` — Detect and repair store/engine divergence.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use berth_common::config::BerthConfig;
use clap::Args;

use super::Context;
use crate::output::short_handle;

/// Arguments for the `reconcile` command.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Keep reconciling on a fixed interval until interrupted.
    #[arg(long, conflicts_with = "purge")]
    pub watch: bool,

    /// Seconds between passes in watch mode (defaults to the configured
    /// interval).
    #[arg(long)]
    pub interval: Option<u64>,

    /// Also stop and remove containers no rental record owns.
    #[arg(long)]
    pub purge: bool,
}

/// The flag wins over the configured interval.
fn interval_secs(args: &ReconcileArgs, config: &BerthConfig) -> u64 {
    args.interval.unwrap_or(config.reconcile_interval_secs)
}

/// Executes the `reconcile` command.
///
/// # Errors
///
/// Returns an error if a pass cannot read the store or the engine, or
/// if purging an unowned container fails.
pub fn execute(ctx: &Context, args: ReconcileArgs) -> anyhow::Result<()> {
    if args.watch {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_handler = stop.clone();
        ctrlc::set_handler(move || {
            stop_handler.store(true, Ordering::SeqCst);
        })?;
        let secs = interval_secs(&args, &ctx.config);
        println!("Reconciling every {secs}s; Ctrl-C to stop.");
        ctx.reconciler.run_every(Duration::from_secs(secs), &stop);
        return Ok(());
    }

    let report = ctx
        .reconciler
        .run_once()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!(
        "Reconcile: {} orphaned record(s) discarded, {} record(s) demoted, {} unowned container(s).",
        report.orphaned.len(),
        report.demoted.len(),
        report.unowned.len()
    );

    for handle in &report.unowned {
        if args.purge {
            let _ = ctx
                .machine
                .delete_container(handle)
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("  purged {}", short_handle(handle.as_str()));
        } else {
            println!("  unowned: {}", short_handle(handle.as_str()));
        }
    }
    Ok(())
}
