// src/pipeline/report.rs

//! Per-user repository report pipeline.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::github::{RemoteRepoClient, RepoApi};
use crate::models::{ActivityStatistics, ActivityWindow, Config};
use crate::report::{self, ReportContext, ReportFormat};
use crate::services::{ActivityAggregator, sidecar_path};
use crate::utils::fs::{save_json, write_text};

/// What to report on.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub owner: String,
    pub repo: String,
    pub username: String,
    pub window: ActivityWindow,
    pub format: ReportFormat,
}

/// A rendered report and the statistics behind it.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub format: ReportFormat,
    pub stats: ActivityStatistics,
    pub context: ReportContext,
    pub body: String,
}

/// Fetch, aggregate and render one report.
pub fn run_report<A: RepoApi + ?Sized>(
    api: &A,
    request: &ReportRequest,
    config: &Config,
) -> Result<GeneratedReport> {
    log::info!(
        "Analyzing @{} in {}/{} from {} to {}",
        request.username,
        request.owner,
        request.repo,
        request.window.since_date(),
        request.window.until_date()
    );

    let client = RemoteRepoClient::new(
        api,
        &request.owner,
        &request.repo,
        &request.username,
        config.search.clone(),
    );
    let stats = ActivityAggregator::new(
        client,
        request.window,
        config.report.body_preview_chars,
    )
    .collect();

    let context = ReportContext::new(
        &request.owner,
        &request.repo,
        &request.username,
        request.window,
    );
    let body = report::render(&stats, &context, request.format, &config.report)?;

    Ok(GeneratedReport {
        format: request.format,
        stats,
        context,
        body,
    })
}

/// Write the report to `output`, or to stdout when no path is given.
///
/// HTML written to a file gets a `.metrics.json` sidecar next to it.
pub fn write_report(report: &GeneratedReport, output: Option<&Path>) -> Result<()> {
    let Some(path) = output else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(report.body.as_bytes())?;
        if !report.body.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        return Ok(());
    };

    write_text(path, &report.body)?;
    log::info!("Report saved to: {}", path.display());

    if report.format == ReportFormat::Html {
        let sidecar = sidecar_path(path);
        save_json(&sidecar, &report::sidecar_metrics(&report.stats, &report.context))?;
        log::debug!("Metrics sidecar saved to: {}", sidecar.display());
    }
    Ok(())
}
