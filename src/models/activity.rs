//! Activity records and the per-run statistics aggregate.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Trailing date range analyzed by a report run.
///
/// Only the lower bound filters events; `until` marks the end of the period
/// for display and for the `days` arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub days: u32,
}

impl ActivityWindow {
    /// Window of `days` days ending at `until`.
    pub fn ending_at(until: DateTime<Utc>, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(AppError::validation("window must cover at least one day"));
        }
        Ok(Self {
            since: until - Duration::days(i64::from(days)),
            until,
            days,
        })
    }

    /// Window ending now, or at 00:00 UTC of `end_date` when given.
    pub fn trailing(days: u32, end_date: Option<NaiveDate>) -> Result<Self> {
        let until = match end_date {
            Some(date) => {
                let midnight = date
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| AppError::invalid_date(date.to_string()))?;
                Utc.from_utc_datetime(&midnight)
            }
            None => Utc::now(),
        };
        Self::ending_at(until, days)
    }

    /// Whether a timestamp falls on or after the window start.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.since
    }

    /// Window start as `YYYY-MM-DD`, the form search qualifiers expect.
    pub fn since_date(&self) -> String {
        self.since.format("%Y-%m-%d").to_string()
    }

    /// Window end as `YYYY-MM-DD`.
    pub fn until_date(&self) -> String {
        self.until.format("%Y-%m-%d").to_string()
    }
}

/// Open/closed state shared by pull requests and issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

/// Pull request size bucket, by total changed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

/// Exclusive upper bounds, tested in ascending order.
const SIZE_THRESHOLDS: [(u64, SizeClass); 5] = [
    (10, SizeClass::Xs),
    (30, SizeClass::S),
    (100, SizeClass::M),
    (500, SizeClass::L),
    (1000, SizeClass::Xl),
];

impl SizeClass {
    pub const ALL: [SizeClass; 6] = [
        SizeClass::Xs,
        SizeClass::S,
        SizeClass::M,
        SizeClass::L,
        SizeClass::Xl,
        SizeClass::Xxl,
    ];

    /// Classify a pull request by `additions + deletions`.
    pub fn from_changes(total_changes: u64) -> Self {
        SIZE_THRESHOLDS
            .iter()
            .find(|(bound, _)| total_changes < *bound)
            .map(|(_, class)| *class)
            .unwrap_or(SizeClass::Xxl)
    }

    /// Lowercase key, also used as the CSS badge suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Xs => "xs",
            SizeClass::S => "s",
            SizeClass::M => "m",
            SizeClass::L => "l",
            SizeClass::Xl => "xl",
            SizeClass::Xxl => "xxl",
        }
    }

    /// Uppercase badge label.
    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Xs => "XS",
            SizeClass::S => "S",
            SizeClass::M => "M",
            SizeClass::L => "L",
            SizeClass::Xl => "XL",
            SizeClass::Xxl => "XXL",
        }
    }

    /// Human description of the bucket range.
    pub fn description(&self) -> &'static str {
        match self {
            SizeClass::Xs => "< 10 changes",
            SizeClass::S => "10-29 changes",
            SizeClass::M => "30-99 changes",
            SizeClass::L => "100-499 changes",
            SizeClass::Xl => "500-999 changes",
            SizeClass::Xxl => "≥ 1000 changes",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count of opened pull requests per size class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeDistribution {
    pub xs: usize,
    pub s: usize,
    pub m: usize,
    pub l: usize,
    pub xl: usize,
    pub xxl: usize,
}

impl SizeDistribution {
    pub fn record(&mut self, class: SizeClass) {
        *self.slot(class) += 1;
    }

    pub fn get(&self, class: SizeClass) -> usize {
        match class {
            SizeClass::Xs => self.xs,
            SizeClass::S => self.s,
            SizeClass::M => self.m,
            SizeClass::L => self.l,
            SizeClass::Xl => self.xl,
            SizeClass::Xxl => self.xxl,
        }
    }

    pub fn total(&self) -> usize {
        SizeClass::ALL.iter().map(|class| self.get(*class)).sum()
    }

    fn slot(&mut self, class: SizeClass) -> &mut usize {
        match class {
            SizeClass::Xs => &mut self.xs,
            SizeClass::S => &mut self.s,
            SizeClass::M => &mut self.m,
            SizeClass::L => &mut self.l,
            SizeClass::Xl => &mut self.xl,
            SizeClass::Xxl => &mut self.xxl,
        }
    }
}

/// Final disposition of an authored pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrOutcome {
    Merged,
    Closed,
    Open,
}

/// A pull request authored by the analyzed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: ItemState,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub commit_count: u64,
    pub total_changes: u64,
    pub size_class: SizeClass,
}

impl PullRequestRecord {
    /// Merged wins over closed; a closed PR without a merge time was rejected.
    pub fn outcome(&self) -> PrOutcome {
        if self.merged_at.is_some() {
            PrOutcome::Merged
        } else if self.state == ItemState::Closed {
            PrOutcome::Closed
        } else {
            PrOutcome::Open
        }
    }
}

/// One review submission by the analyzed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub pr_number: u64,
    pub pr_title: String,
    pub pr_url: String,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub body_preview: String,
}

/// An issue opened (or closed) by the analyzed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: ItemState,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comment_count: u64,
}

/// An issue whose event history shows the analyzed user closing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedIssueRecord {
    #[serde(flatten)]
    pub issue: IssueRecord,
    /// Timestamp of the attributing `closed` event
    pub closed_by_user_at: DateTime<Utc>,
}

/// A comment left by the analyzed user on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueCommentRecord {
    pub issue_number: u64,
    pub issue_title: String,
    pub issue_url: String,
    pub issue_state: ItemState,
    pub created_at: DateTime<Utc>,
    pub body_preview: String,
}

/// A commit authored directly by the analyzed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub short_sha: String,
    pub message: String,
    pub authored_date: Option<DateTime<Utc>>,
    pub url: String,
}

/// The six fetch categories, used to report partial failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    PullRequests,
    Reviews,
    IssuesOpened,
    IssuesClosed,
    IssueComments,
    Commits,
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityCategory::PullRequests => "pull requests",
            ActivityCategory::Reviews => "reviews",
            ActivityCategory::IssuesOpened => "issues opened",
            ActivityCategory::IssuesClosed => "issues closed",
            ActivityCategory::IssueComments => "issue comments",
            ActivityCategory::Commits => "commits",
        };
        f.write_str(name)
    }
}

/// Aggregated activity for one user, one repository, one window.
///
/// Built incrementally by the aggregator; read-only once the run completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityStatistics {
    pub pull_requests_opened: Vec<PullRequestRecord>,
    pub pull_requests_merged: Vec<PullRequestRecord>,
    pub pull_requests_closed: Vec<PullRequestRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub issues_opened: Vec<IssueRecord>,
    pub issues_closed: Vec<ClosedIssueRecord>,
    pub issue_comments: Vec<IssueCommentRecord>,
    pub commits: Vec<CommitRecord>,

    pub total_additions: u64,
    pub total_deletions: u64,
    pub total_files_changed: u64,
    pub total_commits_in_prs: u64,
    pub total_reviews_given: usize,
    pub unique_prs_reviewed: usize,
    pub unique_issues_commented: usize,
    pub size_distribution: SizeDistribution,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_categories: Vec<ActivityCategory>,
}

impl ActivityStatistics {
    /// File an authored pull request under opened and at most one of merged/closed.
    pub fn record_pull_request(&mut self, pr: PullRequestRecord) {
        self.total_additions += pr.additions;
        self.total_deletions += pr.deletions;
        self.total_files_changed += pr.changed_files;
        self.total_commits_in_prs += pr.commit_count;
        self.size_distribution.record(pr.size_class);

        match pr.outcome() {
            PrOutcome::Merged => self.pull_requests_merged.push(pr.clone()),
            PrOutcome::Closed => self.pull_requests_closed.push(pr.clone()),
            PrOutcome::Open => {}
        }
        self.pull_requests_opened.push(pr);
    }

    /// Replace the retained reviews and refresh the review roll-ups.
    pub fn set_reviews(&mut self, reviews: Vec<ReviewRecord>) {
        self.total_reviews_given = reviews.len();
        self.unique_prs_reviewed = reviews
            .iter()
            .map(|r| r.pr_number)
            .collect::<HashSet<_>>()
            .len();
        self.reviews = reviews;
    }

    /// Replace the retained comments and refresh the distinct-issue count.
    pub fn set_issue_comments(&mut self, comments: Vec<IssueCommentRecord>) {
        self.unique_issues_commented = comments
            .iter()
            .map(|c| c.issue_number)
            .collect::<HashSet<_>>()
            .len();
        self.issue_comments = comments;
    }

    pub fn mark_failed(&mut self, category: ActivityCategory) {
        if !self.failed_categories.contains(&category) {
            self.failed_categories.push(category);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(number: u64, state: ItemState, merged: bool, changes: u64) -> PullRequestRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        PullRequestRecord {
            number,
            title: format!("PR {}", number),
            url: format!("https://github.com/o/r/pull/{}", number),
            state,
            created_at: at,
            merged_at: merged.then_some(at),
            closed_at: (state == ItemState::Closed).then_some(at),
            additions: changes,
            deletions: 0,
            changed_files: 1,
            commit_count: 2,
            total_changes: changes,
            size_class: SizeClass::from_changes(changes),
        }
    }

    #[test]
    fn test_size_class_boundaries() {
        assert_eq!(SizeClass::from_changes(0), SizeClass::Xs);
        assert_eq!(SizeClass::from_changes(9), SizeClass::Xs);
        assert_eq!(SizeClass::from_changes(10), SizeClass::S);
        assert_eq!(SizeClass::from_changes(29), SizeClass::S);
        assert_eq!(SizeClass::from_changes(30), SizeClass::M);
        assert_eq!(SizeClass::from_changes(99), SizeClass::M);
        assert_eq!(SizeClass::from_changes(100), SizeClass::L);
        assert_eq!(SizeClass::from_changes(499), SizeClass::L);
        assert_eq!(SizeClass::from_changes(500), SizeClass::Xl);
        assert_eq!(SizeClass::from_changes(999), SizeClass::Xl);
        assert_eq!(SizeClass::from_changes(1000), SizeClass::Xxl);
        assert_eq!(SizeClass::from_changes(u64::MAX), SizeClass::Xxl);
    }

    #[test]
    fn test_size_classes_are_monotonic() {
        let mut previous = 0;
        for changes in 0..1500u64 {
            let index = SizeClass::ALL
                .iter()
                .position(|c| *c == SizeClass::from_changes(changes))
                .unwrap();
            assert!(index >= previous, "class went backwards at {}", changes);
            previous = index;
        }
        assert_eq!(previous, SizeClass::ALL.len() - 1);
    }

    #[test]
    fn test_window_from_end_date() {
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let window = ActivityWindow::trailing(7, Some(end)).unwrap();
        assert_eq!(window.since_date(), "2026-01-24");
        assert_eq!(window.until_date(), "2026-01-31");
        assert!(window.since < window.until);
    }

    #[test]
    fn test_window_rejects_zero_days() {
        assert!(ActivityWindow::trailing(0, None).is_err());
    }

    #[test]
    fn test_window_contains_lower_bound() {
        let until = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let window = ActivityWindow::ending_at(until, 7).unwrap();
        assert!(window.contains(window.since));
        assert!(!window.contains(window.since - Duration::seconds(1)));
    }

    #[test]
    fn test_record_pull_request_buckets() {
        let mut stats = ActivityStatistics::default();
        stats.record_pull_request(pr(1, ItemState::Closed, true, 5));
        stats.record_pull_request(pr(2, ItemState::Closed, false, 50));
        stats.record_pull_request(pr(3, ItemState::Open, false, 2000));

        assert_eq!(stats.pull_requests_opened.len(), 3);
        assert_eq!(stats.pull_requests_merged.len(), 1);
        assert_eq!(stats.pull_requests_merged[0].number, 1);
        assert_eq!(stats.pull_requests_closed.len(), 1);
        assert_eq!(stats.pull_requests_closed[0].number, 2);
        assert_eq!(stats.size_distribution.total(), 3);
        assert_eq!(stats.size_distribution.xxl, 1);
        assert_eq!(stats.total_additions, 2055);
        assert_eq!(stats.total_commits_in_prs, 6);
        assert_eq!(stats.total_files_changed, 3);
    }

    #[test]
    fn test_set_reviews_counts_unique_prs() {
        let review = |pr_number| ReviewRecord {
            pr_number,
            pr_title: String::new(),
            pr_url: String::new(),
            state: "APPROVED".to_string(),
            submitted_at: None,
            body_preview: String::new(),
        };
        let mut stats = ActivityStatistics::default();
        stats.set_reviews(vec![review(7), review(7), review(7), review(8)]);
        assert_eq!(stats.total_reviews_given, 4);
        assert_eq!(stats.unique_prs_reviewed, 2);
    }

    #[test]
    fn test_mark_failed_is_idempotent() {
        let mut stats = ActivityStatistics::default();
        stats.mark_failed(ActivityCategory::Reviews);
        stats.mark_failed(ActivityCategory::Reviews);
        assert_eq!(stats.failed_categories, vec![ActivityCategory::Reviews]);
    }
}
