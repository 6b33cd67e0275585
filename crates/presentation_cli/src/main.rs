//! ReviewDesk CLI
//!
//! Command-line interface for reviewers: register items, approve or return
//! them through committee meetings and inspect their audit trail.

#![allow(clippy::print_stdout)]

use clap::Parser;
use infrastructure::init_telemetry;
use presentation_cli::{Cli, execute, load_config, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on configuration, raised by -v flags
    let mut telemetry = load_config(&cli)?.telemetry;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        telemetry.log_filter = filter.to_string();
    }
    init_telemetry(&telemetry)?;

    let rendered = execute(cli).await?;
    print!("{rendered}");
    Ok(())
}
