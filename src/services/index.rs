//! Combine scraped report rows into the team index.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::models::{ScrapedReportRow, TeamIndex, UserSummaryRow, labels};
use crate::utils::fs::load_json;

/// Groups report rows by user and repository.
#[derive(Debug, Default)]
pub struct IndexAggregator {
    display_names: HashMap<String, String>,
}

impl IndexAggregator {
    pub fn new(display_names: HashMap<String, String>) -> Self {
        Self { display_names }
    }

    /// Load the username -> display name mapping.
    ///
    /// A missing file yields an empty mapping; an unreadable one is logged
    /// and also yields an empty mapping.
    pub fn load_display_names(path: &Path) -> HashMap<String, String> {
        if !path.exists() {
            log::debug!("No display name file at {}", path.display());
            return HashMap::new();
        }
        load_json(path).unwrap_or_else(|e| {
            log::warn!("Could not load {}: {}", path.display(), e);
            HashMap::new()
        })
    }

    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        self.display_names
            .get(username)
            .map(String::as_str)
            .unwrap_or(username)
    }

    pub fn build(&self, mut rows: Vec<ScrapedReportRow>) -> TeamIndex {
        // newest first, ties by username descending
        rows.sort_by(|a, b| {
            (&b.report_date, &b.username).cmp(&(&a.report_date, &a.username))
        });

        let unique_users = rows
            .iter()
            .map(|r| r.username.as_str())
            .collect::<HashSet<_>>()
            .len();
        let unique_repos = rows
            .iter()
            .map(|r| r.repo.as_str())
            .collect::<HashSet<_>>()
            .len();

        let summary = self.summarize(&rows);

        // stable, so same-user rows keep newest-first order
        rows.sort_by_key(|r| r.username.to_lowercase());

        TeamIndex {
            reports: rows,
            summary,
            unique_users,
            unique_repos,
        }
    }

    /// One row per username: most recent date and summed merged PRs.
    pub fn summarize(&self, rows: &[ScrapedReportRow]) -> Vec<UserSummaryRow> {
        let mut by_user: BTreeMap<&str, (String, u64)> = BTreeMap::new();
        for row in rows {
            let merged = row.metric_count(labels::PRS_MERGED);
            let entry = by_user
                .entry(row.username.as_str())
                .or_insert_with(|| (row.report_date.clone(), 0));
            if row.report_date > entry.0 {
                entry.0 = row.report_date.clone();
            }
            entry.1 += merged;
        }

        by_user
            .into_iter()
            .map(|(username, (most_recent_date, total_prs_merged))| UserSummaryRow {
                username: username.to_string(),
                display_name: self.display_name(username).to_string(),
                most_recent_date,
                total_prs_merged,
            })
            .collect()
    }
}
