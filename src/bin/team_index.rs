//! Team index CLI
//!
//! Builds `reports/index.html` from the reports in `reports/team/`.

use std::path::PathBuf;

use clap::Parser;
use repo_activity::{
    config::load_config,
    error::Result,
    pipeline::{self, IndexOutcome},
};

/// Generate the team index page from per-user HTML reports
#[derive(Parser, Debug)]
#[command(name = "team-index", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match pipeline::run_team_index(&config.team)? {
        IndexOutcome::Written { path, reports } => {
            log::info!("Index page created with {} reports: {}", reports, path.display());
        }
        IndexOutcome::NoInputFiles => {
            log::info!("Nothing to do: no report files found.");
        }
        IndexOutcome::NoValidReports => {
            log::info!("Nothing to do: no report could be read.");
        }
    }
    Ok(())
}
