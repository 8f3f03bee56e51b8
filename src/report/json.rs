//! JSON report.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::models::{ActivityStatistics, ActivityWindow};
use crate::report::{ReportContext, ReportSummary};

#[derive(Serialize)]
struct JsonReport<'a> {
    repository: String,
    username: &'a str,
    period: &'a ActivityWindow,
    generated_at: DateTime<Local>,
    summary: &'a ReportSummary,
    statistics: &'a ActivityStatistics,
}

pub fn render(
    stats: &ActivityStatistics,
    summary: &ReportSummary,
    context: &ReportContext,
) -> Result<String> {
    let report = JsonReport {
        repository: context.repo_slug(),
        username: &context.username,
        period: &context.window,
        generated_at: context.generated_at,
        summary,
        statistics: stats,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
