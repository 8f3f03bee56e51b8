//! Reduce raw API collections into [`ActivityStatistics`].

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::github::api::RepoApi;
use crate::github::client::RemoteRepoClient;
use crate::github::types::{
    ClosedIssueCandidate, CommentedIssue, CommitItem, IssueEvent, PullRequestDetail,
    ReviewedPullRequest, SearchItem,
};
use crate::models::{
    ActivityCategory, ActivityStatistics, ActivityWindow, ClosedIssueRecord, CommitRecord,
    IssueCommentRecord, IssueRecord, PullRequestRecord, ReviewRecord, SizeClass,
};
use crate::utils::{first_line, preview};

/// Drives a [`RemoteRepoClient`] through every category for one window.
pub struct ActivityAggregator<'a, A: RepoApi + ?Sized> {
    client: RemoteRepoClient<'a, A>,
    window: ActivityWindow,
    preview_chars: usize,
}

impl<'a, A: RepoApi + ?Sized> ActivityAggregator<'a, A> {
    pub fn new(
        client: RemoteRepoClient<'a, A>,
        window: ActivityWindow,
        preview_chars: usize,
    ) -> Self {
        Self {
            client,
            window,
            preview_chars,
        }
    }

    /// Fetch and aggregate all six categories.
    ///
    /// Never fails: a category whose fetch fails is logged, listed in
    /// `failed_categories` and left empty.
    pub fn collect(&self) -> ActivityStatistics {
        let username = self.client.username();
        let mut stats = ActivityStatistics::default();

        log::info!("Fetching PRs by @{}...", username);
        let prs = self.client.search_prs_by_author(&self.window);
        if let Some(prs) = check(&mut stats, ActivityCategory::PullRequests, prs) {
            for detail in prs {
                stats.record_pull_request(pull_request_record(detail));
            }
        }

        log::info!("Fetching reviews by @{}...", username);
        let reviewed = self.client.search_prs_reviewed_by();
        if let Some(reviewed) = check(&mut stats, ActivityCategory::Reviews, reviewed) {
            stats.set_reviews(reviews_in_window(
                &reviewed,
                username,
                &self.window,
                self.preview_chars,
            ));
        }

        log::info!("Fetching issues opened by @{}...", username);
        let opened = self.client.search_issues_by_author(&self.window);
        if let Some(opened) = check(&mut stats, ActivityCategory::IssuesOpened, opened) {
            stats.issues_opened = opened.iter().map(issue_record).collect();
        }

        log::info!("Fetching issues closed by @{}...", username);
        let closed = self.client.search_closed_issues(&self.window);
        if let Some(closed) = check(&mut stats, ActivityCategory::IssuesClosed, closed) {
            stats.issues_closed = issues_closed_by(&closed, username, &self.window);
        }

        log::info!("Fetching issue comments by @{}...", username);
        let commented = self.client.search_issues_commented_on();
        if let Some(commented) = check(&mut stats, ActivityCategory::IssueComments, commented) {
            stats.set_issue_comments(comments_in_window(
                &commented,
                username,
                &self.window,
                self.preview_chars,
            ));
        }

        log::info!("Fetching commits by @{}...", username);
        let commits = self.client.list_commits_by_author(&self.window);
        if let Some(commits) = check(&mut stats, ActivityCategory::Commits, commits) {
            stats.commits = commits.iter().map(commit_record).collect();
        }

        if !stats.failed_categories.is_empty() {
            log::warn!(
                "Report is partial; failed categories: {}",
                stats
                    .failed_categories
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        stats
    }
}

fn check<T>(
    stats: &mut ActivityStatistics,
    category: ActivityCategory,
    result: Result<T>,
) -> Option<T> {
    result
        .map_err(|e: AppError| {
            log::warn!("Failed to fetch {}: {}", category, e);
            stats.mark_failed(category);
        })
        .ok()
}

/// Convert PR details, classifying size once.
pub fn pull_request_record(detail: PullRequestDetail) -> PullRequestRecord {
    let total_changes = detail.additions + detail.deletions;
    PullRequestRecord {
        number: detail.number,
        title: detail.title,
        url: detail.html_url,
        state: detail.state,
        created_at: detail.created_at,
        merged_at: detail.merged_at,
        closed_at: detail.closed_at,
        additions: detail.additions,
        deletions: detail.deletions,
        changed_files: detail.changed_files,
        commit_count: detail.commits,
        total_changes,
        size_class: SizeClass::from_changes(total_changes),
    }
}

pub fn issue_record(item: &SearchItem) -> IssueRecord {
    IssueRecord {
        number: item.number,
        title: item.title.clone(),
        url: item.html_url.clone(),
        state: item.state,
        created_at: item.created_at,
        closed_at: item.closed_at,
        comment_count: item.comments,
    }
}

/// The user's reviews submitted inside the window.
///
/// Reviews without a submission time (pending) are kept.
pub fn reviews_in_window(
    reviewed: &[ReviewedPullRequest],
    username: &str,
    window: &ActivityWindow,
    preview_chars: usize,
) -> Vec<ReviewRecord> {
    reviewed
        .iter()
        .flat_map(|entry| {
            entry
                .reviews
                .iter()
                .filter(|review| review.user.as_ref().is_some_and(|u| u.is(username)))
                .filter(|review| review.submitted_at.is_none_or(|at| window.contains(at)))
                .map(|review| ReviewRecord {
                    pr_number: entry.pull_request.number,
                    pr_title: entry.pull_request.title.clone(),
                    pr_url: entry.pull_request.html_url.clone(),
                    state: review.state.clone(),
                    submitted_at: review.submitted_at,
                    body_preview: preview(review.body.as_deref().unwrap_or(""), preview_chars),
                })
        })
        .collect()
}

/// When the user closed the issue inside the window, if they did.
///
/// With several qualifying `closed` events (reopen and close again) the
/// latest wins.
pub fn closed_by_user_at(
    events: &[IssueEvent],
    username: &str,
    window: &ActivityWindow,
) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|event| event.event == "closed")
        .filter(|event| event.actor.as_ref().is_some_and(|a| a.is(username)))
        .filter_map(|event| event.created_at)
        .filter(|at| window.contains(*at))
        .max()
}

pub fn issues_closed_by(
    candidates: &[ClosedIssueCandidate],
    username: &str,
    window: &ActivityWindow,
) -> Vec<ClosedIssueRecord> {
    candidates
        .iter()
        .filter_map(|candidate| {
            closed_by_user_at(&candidate.events, username, window).map(|at| ClosedIssueRecord {
                issue: issue_record(&candidate.issue),
                closed_by_user_at: at,
            })
        })
        .collect()
}

/// The user's comments posted inside the window.
pub fn comments_in_window(
    commented: &[CommentedIssue],
    username: &str,
    window: &ActivityWindow,
    preview_chars: usize,
) -> Vec<IssueCommentRecord> {
    commented
        .iter()
        .flat_map(|entry| {
            entry
                .comments
                .iter()
                .filter(|comment| comment.user.as_ref().is_some_and(|u| u.is(username)))
                .filter(|comment| window.contains(comment.created_at))
                .map(|comment| IssueCommentRecord {
                    issue_number: entry.issue.number,
                    issue_title: entry.issue.title.clone(),
                    issue_url: entry.issue.html_url.clone(),
                    issue_state: entry.issue.state,
                    created_at: comment.created_at,
                    body_preview: preview(comment.body.as_deref().unwrap_or(""), preview_chars),
                })
        })
        .collect()
}

pub fn commit_record(item: &CommitItem) -> CommitRecord {
    CommitRecord {
        short_sha: item.sha.chars().take(7).collect(),
        message: first_line(&item.commit.message).to_string(),
        authored_date: item.commit.author.as_ref().and_then(|a| a.date),
        url: item.html_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::{self, FakeRepoApi};
    use crate::models::SearchConfig;

    fn window() -> ActivityWindow {
        ActivityWindow::ending_at(fake::ts("2024-01-08T00:00:00Z"), 7).unwrap()
    }

    fn aggregate(api: &FakeRepoApi) -> ActivityStatistics {
        let client = RemoteRepoClient::new(api, "octo", "hello", "alice", SearchConfig::default());
        ActivityAggregator::new(client, window(), 200).collect()
    }

    /// A repository where every category has something for alice.
    fn busy_repo() -> FakeRepoApi {
        let mut api = FakeRepoApi::default();

        api.add_search("is:pr author:", (1..=3).map(fake::item).collect());
        api.add_pull(fake::pull(1, 4, 1, Some("2024-01-03T10:00:00Z")));
        api.add_pull(fake::rejected_pull(2, 40, 10));
        api.add_pull(fake::pull(3, 600, 500, None));

        api.add_search("reviewed-by:", vec![fake::item(10), fake::item(11)]);
        api.reviews.insert(
            10,
            vec![
                fake::review("alice", "APPROVED", Some("2024-01-05T10:00:00Z")),
                fake::review("Alice", "COMMENTED", Some("2024-01-06T10:00:00Z")),
                fake::review("bob", "APPROVED", Some("2024-01-05T10:00:00Z")),
            ],
        );
        api.reviews.insert(
            11,
            vec![
                fake::review("alice", "CHANGES_REQUESTED", Some("2023-12-20T10:00:00Z")),
                fake::review("alice", "PENDING", None),
            ],
        );

        api.add_search("is:issue author:", vec![fake::item(20)]);

        api.add_search("is:closed", vec![fake::closed_item(30), fake::closed_item(31)]);
        api.events.insert(30, vec![fake::event("closed", "ALICE", "2024-01-05T12:00:00Z")]);
        api.events.insert(31, vec![fake::event("closed", "bob", "2024-01-05T12:00:00Z")]);

        api.add_search("commenter:", vec![fake::item(40)]);
        api.comments.insert(
            40,
            vec![
                fake::comment("alice", "2024-01-04T08:00:00Z", "Looks good"),
                fake::comment("bob", "2024-01-04T09:00:00Z", "Thanks"),
                fake::comment("alice", "2023-12-01T08:00:00Z", "Old news"),
            ],
        );

        api.commits = vec![
            fake::commit("0123456789abcdef", "Bump version\n\nSigned-off-by: alice"),
            fake::commit("fedcba9876543210", "Fix typo"),
        ];
        api
    }

    #[test]
    fn test_collect_full_repository() {
        let stats = aggregate(&busy_repo());

        assert!(stats.failed_categories.is_empty());
        assert_eq!(stats.pull_requests_opened.len(), 3);
        assert_eq!(stats.pull_requests_merged.len(), 1);
        assert_eq!(stats.pull_requests_closed.len(), 1);
        assert_eq!(stats.size_distribution.xs, 1);
        assert_eq!(stats.size_distribution.m, 1);
        assert_eq!(stats.size_distribution.xxl, 1);
        assert_eq!(stats.total_additions, 644);
        assert_eq!(stats.total_deletions, 511);

        assert_eq!(stats.issues_opened.len(), 1);
        assert_eq!(stats.issues_closed.len(), 1);
        assert_eq!(stats.issues_closed[0].issue.number, 30);
        assert_eq!(stats.issue_comments.len(), 1);
        assert_eq!(stats.unique_issues_commented, 1);

        assert_eq!(stats.commits[0].short_sha, "0123456");
        assert_eq!(stats.commits[0].message, "Bump version");
    }

    #[test]
    fn test_size_distribution_sums_to_opened() {
        let stats = aggregate(&busy_repo());
        assert_eq!(
            stats.size_distribution.total(),
            stats.pull_requests_opened.len()
        );
    }

    #[test]
    fn test_merged_and_closed_are_exclusive() {
        let stats = aggregate(&busy_repo());
        for merged in &stats.pull_requests_merged {
            assert!(!stats
                .pull_requests_closed
                .iter()
                .any(|closed| closed.number == merged.number));
        }
    }

    #[test]
    fn test_review_windowing() {
        let stats = aggregate(&busy_repo());

        // two in-window reviews on #10, the pending one on #11
        assert_eq!(stats.total_reviews_given, 3);
        assert_eq!(stats.unique_prs_reviewed, 2);
        assert!(stats.unique_prs_reviewed <= stats.total_reviews_given);
        assert!(stats.reviews.iter().all(|r| r.state != "CHANGES_REQUESTED"));
    }

    #[test]
    fn test_comments_by_other_authors_excluded() {
        let stats = aggregate(&busy_repo());
        assert_eq!(stats.issue_comments.len(), 1);
        assert_eq!(stats.issue_comments[0].body_preview, "Looks good");
    }

    #[test]
    fn test_failed_reviews_leave_other_categories() {
        let mut api = busy_repo();
        api.fail_search("reviewed-by:");

        let stats = aggregate(&api);
        assert_eq!(stats.failed_categories, vec![ActivityCategory::Reviews]);
        assert_eq!(stats.total_reviews_given, 0);
        assert_eq!(stats.unique_prs_reviewed, 0);
        assert_eq!(stats.pull_requests_opened.len(), 3);
        assert_eq!(stats.issue_comments.len(), 1);
        assert_eq!(stats.commits.len(), 2);
    }

    #[test]
    fn test_failed_item_fetches_do_not_fail_categories() {
        let mut api = busy_repo();
        api.failing_items.extend([11, 31, 40]);

        let stats = aggregate(&api);
        assert!(stats.failed_categories.is_empty());
        assert_eq!(stats.total_reviews_given, 2);
        assert_eq!(stats.unique_prs_reviewed, 1);
        assert_eq!(stats.issues_closed.len(), 1);
        assert_eq!(stats.issues_closed[0].issue.number, 30);
        assert!(stats.issue_comments.is_empty());
    }

    #[test]
    fn test_every_category_failing_still_completes() {
        let mut api = FakeRepoApi::default();
        api.fail_search("repo:");
        api.fail_commits = true;

        let stats = aggregate(&api);
        assert_eq!(stats.failed_categories.len(), 6);
        assert!(stats.pull_requests_opened.is_empty());
    }

    #[test]
    fn test_closed_by_user_requires_window() {
        let events = vec![
            fake::event("closed", "alice", "2023-12-30T00:00:00Z"),
            fake::event("reopened", "alice", "2024-01-02T00:00:00Z"),
        ];
        assert_eq!(closed_by_user_at(&events, "alice", &window()), None);
    }

    #[test]
    fn test_closed_by_user_takes_latest_close() {
        let events = vec![
            fake::event("closed", "alice", "2024-01-02T00:00:00Z"),
            fake::event("reopened", "bob", "2024-01-03T00:00:00Z"),
            fake::event("closed", "alice", "2024-01-04T00:00:00Z"),
        ];
        assert_eq!(
            closed_by_user_at(&events, "alice", &window()),
            Some(fake::ts("2024-01-04T00:00:00Z"))
        );
    }

    #[test]
    fn test_review_body_preview_is_truncated() {
        let mut review = fake::review("alice", "COMMENTED", None);
        review.body = Some("x".repeat(500));
        let reviewed = vec![ReviewedPullRequest {
            pull_request: fake::item(1),
            reviews: vec![review],
        }];

        let records = reviews_in_window(&reviewed, "alice", &window(), 200);
        assert_eq!(records[0].body_preview.len(), 200);
    }
}
