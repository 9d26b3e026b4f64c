//! # berth — Berth CLI
//!
//! Container rental on shared infrastructure: users request a server,
//! admins approve or reclaim it, the reconciler keeps records and
//! containers convergent.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
        )
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
