//! Repository activity report CLI
//!
//! Summarizes one user's activity in one GitHub repository.

use std::path::PathBuf;

use clap::Parser;
use repo_activity::{
    config::{self, load_config, parse_end_date, resolve_credentials},
    error::{AppError, Result},
    github::HttpRepoApi,
    models::ActivityWindow,
    pipeline::{self, ReportRequest},
    report::ReportFormat,
    utils::http,
};

/// Generate an activity report for a user within a specific repository
#[derive(Parser, Debug)]
#[command(
    name = "repo-report",
    version,
    about,
    after_help = "Examples:\n  \
        repo-report octo hello alice --days 7\n  \
        repo-report octo hello alice --days 30 --format html --output report.html\n  \
        repo-report octo hello alice --days 7 --end-date 2026-01-31"
)]
struct Cli {
    /// Repository owner
    owner: String,

    /// Repository name
    repo: String,

    /// GitHub username to analyze
    username: String,

    /// Number of days to analyze
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Last day of the period, YYYY-MM-DD (default: now)
    #[arg(long, alias = "startdate", value_name = "YYYY-MM-DD")]
    end_date: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// GitHub token (or set GITHUB_TOKEN / GITHUB_ENTERPRISE_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// API base URL for GitHub Enterprise (or set GITHUB_API_URL)
    #[arg(long)]
    api_url: Option<String>,

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

    // Reject bad input before any request goes out
    let end_date = match cli.end_date.as_deref() {
        Some(value) => Some(parse_end_date(value).inspect_err(|e| log::error!("{}", e))?),
        None => None,
    };
    let window = ActivityWindow::trailing(cli.days, end_date)
        .inspect_err(|e| log::error!("{}", e))?;

    let config = load_config(cli.config.as_deref())?;

    let credentials = resolve_credentials(
        cli.token.as_deref(),
        cli.api_url.as_deref(),
        &config.http.api_url,
        |key| std::env::var(key).ok(),
    );
    if credentials.token.is_none() {
        log::warn!("No GitHub token provided. Rate limits will be lower (60 requests/hour).");
        if credentials.custom_api {
            log::warn!(
                "Set {} (or {}) or use --token.",
                config::ENTERPRISE_TOKEN_ENV,
                config::TOKEN_ENV
            );
        } else {
            log::warn!("Set {} or use --token.", config::TOKEN_ENV);
        }
    }
    log::debug!("Using API at {}", credentials.api_url);

    let client = http::create_client(&config.http, credentials.token.as_deref())?;
    let api = HttpRepoApi::new(client, &credentials.api_url, &cli.owner, &cli.repo)
        .map_err(|e| AppError::config(format!("bad API URL {}: {e}", credentials.api_url)))?;

    let request = ReportRequest {
        owner: cli.owner,
        repo: cli.repo,
        username: cli.username,
        window,
        format: cli.format,
    };
    let report = pipeline::run_report(&api, &request, &config)?;
    pipeline::write_report(&report, cli.output.as_deref())?;

    Ok(())
}
