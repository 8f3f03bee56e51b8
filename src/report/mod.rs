//! Report rendering.
//!
//! Every format reads the same [`ReportSummary`], so the numbers a text,
//! HTML and JSON rendering show for one run always agree.

pub mod html;
pub mod index_page;
pub mod json;
pub mod text;

use std::fmt;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::models::{
    ActivityStatistics, ActivityWindow, ReportConfig, ReportMetrics, SizeDistribution, labels,
};

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Text => "text",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Who and what a report is about.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub owner: String,
    pub repo: String,
    pub username: String,
    pub window: ActivityWindow,
    pub generated_at: DateTime<Local>,
}

impl ReportContext {
    pub fn new(owner: &str, repo: &str, username: &str, window: ActivityWindow) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            username: username.to_string(),
            window,
            generated_at: Local::now(),
        }
    }

    /// `owner/name`
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Headline numbers derived once from the statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub prs_opened: usize,
    pub prs_merged: usize,
    pub prs_closed: usize,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
    pub commits_in_prs: u64,
    pub reviews_given: usize,
    pub unique_prs_reviewed: usize,
    pub issues_opened: usize,
    pub issues_closed: usize,
    pub issue_comments: usize,
    pub unique_issues_commented: usize,
    pub direct_commits: usize,
    pub size_distribution: SizeDistribution,
}

impl ReportSummary {
    pub fn from_stats(stats: &ActivityStatistics) -> Self {
        Self {
            prs_opened: stats.pull_requests_opened.len(),
            prs_merged: stats.pull_requests_merged.len(),
            prs_closed: stats.pull_requests_closed.len(),
            lines_added: stats.total_additions,
            lines_deleted: stats.total_deletions,
            files_changed: stats.total_files_changed,
            commits_in_prs: stats.total_commits_in_prs,
            reviews_given: stats.total_reviews_given,
            unique_prs_reviewed: stats.unique_prs_reviewed,
            issues_opened: stats.issues_opened.len(),
            issues_closed: stats.issues_closed.len(),
            issue_comments: stats.issue_comments.len(),
            unique_issues_commented: stats.unique_issues_commented,
            direct_commits: stats.commits.len(),
            size_distribution: stats.size_distribution,
        }
    }

    /// The four cards at the top of the HTML report.
    pub fn headline_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("✅", labels::PRS_MERGED, self.prs_merged.to_string()),
            MetricCard::new("📈", labels::LINES_ADDED, format!("+{}", self.lines_added)),
            MetricCard::new("📉", labels::LINES_DELETED, format!("-{}", self.lines_deleted)),
            MetricCard::new("💾", labels::COMMITS_IN_PRS, self.commits_in_prs.to_string()),
        ]
    }

    /// Cards of the collaboration section.
    pub fn collaboration_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("👀", labels::REVIEWS_GIVEN, self.reviews_given.to_string())
                .with_note(format!("{} unique PRs", self.unique_prs_reviewed)),
            MetricCard::new("🐛", labels::ISSUES_OPENED, self.issues_opened.to_string()),
            MetricCard::new("✅", labels::ISSUES_CLOSED, self.issues_closed.to_string()),
            MetricCard::new("💬", labels::ISSUE_COMMENTS, self.issue_comments.to_string())
                .with_note(format!("{} unique issues", self.unique_issues_commented)),
        ]
    }

    /// Every card in document order.
    pub fn all_cards(&self) -> Vec<MetricCard> {
        let mut cards = self.headline_cards();
        cards.extend(self.collaboration_cards());
        cards
    }
}

/// One labelled number of the HTML report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
    pub note: Option<String>,
}

impl MetricCard {
    fn new(icon: &'static str, label: &'static str, value: String) -> Self {
        Self {
            icon,
            label,
            value,
            note: None,
        }
    }

    fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }

    /// Label as it appears in the document, icon included.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.icon, self.label)
    }
}

/// Render statistics in the requested format.
pub fn render(
    stats: &ActivityStatistics,
    context: &ReportContext,
    format: ReportFormat,
    config: &ReportConfig,
) -> Result<String> {
    let summary = ReportSummary::from_stats(stats);
    match format {
        ReportFormat::Text => Ok(text::render(stats, &summary, context, config)),
        ReportFormat::Html => Ok(html::render(stats, &summary, context, config)),
        ReportFormat::Json => json::render(stats, &summary, context),
    }
}

/// Metrics written beside an HTML report for the index builder.
///
/// Labels and values are exactly those of the rendered metric cards.
pub fn sidecar_metrics(stats: &ActivityStatistics, context: &ReportContext) -> ReportMetrics {
    let metrics: IndexMap<String, String> = ReportSummary::from_stats(stats)
        .all_cards()
        .into_iter()
        .map(|card| (card.display_label(), card.value))
        .collect();

    ReportMetrics {
        username: context.username.clone(),
        repo: context.repo_slug(),
        report_date: context.window.until_date(),
        metrics,
    }
}
