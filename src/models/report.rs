//! Report metrics as exchanged between the report and index tools.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metric label texts shared by the HTML renderer and the index lookups.
///
/// Rendered labels carry an icon prefix; lookups match by substring.
pub mod labels {
    pub const PRS_MERGED: &str = "PRs Merged";
    pub const LINES_ADDED: &str = "Lines Added";
    pub const LINES_DELETED: &str = "Lines Deleted";
    pub const COMMITS_IN_PRS: &str = "Commits in PRs";
    pub const REVIEWS_GIVEN: &str = "Reviews Given";
    pub const ISSUES_OPENED: &str = "Issues Opened";
    pub const ISSUES_CLOSED: &str = "Issues Closed";
    pub const ISSUE_COMMENTS: &str = "Issue Comments";
    pub const COMMENTS: &str = "Comments";
    pub const COMMITS: &str = "Commits";
}

/// Machine-readable metrics written next to an HTML report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub username: String,
    /// `owner/name`
    pub repo: String,
    /// Last day of the reported period, `YYYY-MM-DD`
    pub report_date: String,
    /// Rendered label -> rendered value, in display order
    pub metrics: IndexMap<String, String>,
}

/// Metrics recovered from one previously generated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedReportRow {
    pub filename: String,
    pub report_date: String,
    pub username: String,
    pub repo: String,
    pub metrics: IndexMap<String, String>,
}

impl ScrapedReportRow {
    /// Raw value of the first metric whose label contains `pattern`.
    pub fn metric(&self, pattern: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|(label, _)| label.contains(pattern))
            .map(|(_, value)| value.as_str())
    }

    /// Display form: digits, signs and commas only, `"0"` when nothing is left.
    pub fn metric_display(&self, pattern: &str) -> String {
        self.metric(pattern)
            .map(clean_metric_value)
            .unwrap_or_else(|| "0".to_string())
    }

    /// Numeric form: digits only, `0` when nothing is left.
    pub fn metric_count(&self, pattern: &str) -> u64 {
        self.metric(pattern).map(metric_count).unwrap_or(0)
    }
}

/// Strip everything but digits, `+`, `-` and `,`.
pub fn clean_metric_value(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ','))
        .collect();
    if cleaned.is_empty() {
        "0".to_string()
    } else {
        cleaned
    }
}

/// Parse the digits of a rendered metric, ignoring everything else.
pub fn metric_count(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// One line of the per-user summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummaryRow {
    pub username: String,
    pub display_name: String,
    pub most_recent_date: String,
    pub total_prs_merged: u64,
}

/// Everything the team index page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamIndex {
    /// Detail rows, case-insensitive username order
    pub reports: Vec<ScrapedReportRow>,
    /// One row per user, username order
    pub summary: Vec<UserSummaryRow>,
    pub unique_users: usize,
    pub unique_repos: usize,
}
