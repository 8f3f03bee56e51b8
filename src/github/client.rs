//! Category queries for one user in one repository.

use crate::error::Result;
use crate::github::api::RepoApi;
use crate::github::types::{
    ClosedIssueCandidate, CommentedIssue, CommitItem, PullRequestDetail, ReviewedPullRequest,
    SearchItem,
};
use crate::models::{ActivityWindow, SearchConfig};

/// Issues the per-category queries against a [`RepoApi`].
///
/// The first request of a category decides its success: if it fails the
/// whole category fails. Later failures (a subsequent search page, a
/// per-item detail fetch) only drop what they would have added.
pub struct RemoteRepoClient<'a, A: RepoApi + ?Sized> {
    api: &'a A,
    repo_slug: String,
    username: String,
    search: SearchConfig,
}

impl<'a, A: RepoApi + ?Sized> RemoteRepoClient<'a, A> {
    pub fn new(
        api: &'a A,
        owner: &str,
        repo: &str,
        username: &str,
        search: SearchConfig,
    ) -> Self {
        Self {
            api,
            repo_slug: format!("{owner}/{repo}"),
            username: username.to_string(),
            search,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Pull requests authored by the user since the window start, with details.
    pub fn search_prs_by_author(&self, window: &ActivityWindow) -> Result<Vec<PullRequestDetail>> {
        let query = self.query(&format!(
            "is:pr author:{} created:>={}",
            self.username,
            window.since_date()
        ));
        let hits = self.api.search_issues(&query, "created", 1, self.search.per_page)?;
        log::info!("Found {} PRs by @{}", hits.len(), self.username);

        let details = hits
            .iter()
            .filter_map(|hit| match self.api.pull_request(hit.number) {
                Ok(detail) => Some(detail),
                Err(e) => {
                    log::warn!("Skipping PR #{}: details unavailable: {}", hit.number, e);
                    None
                }
            })
            .collect();
        Ok(details)
    }

    /// Issues opened by the user since the window start.
    pub fn search_issues_by_author(&self, window: &ActivityWindow) -> Result<Vec<SearchItem>> {
        let query = self.query(&format!(
            "is:issue author:{} created:>={}",
            self.username,
            window.since_date()
        ));
        let issues = self.api.search_issues(&query, "created", 1, self.search.per_page)?;
        log::info!("Found {} issues opened by @{}", issues.len(), self.username);
        Ok(issues)
    }

    /// Issues closed since the window start by anyone, with their event history.
    pub fn search_closed_issues(
        &self,
        window: &ActivityWindow,
    ) -> Result<Vec<ClosedIssueCandidate>> {
        let query = self.query(&format!("is:issue is:closed closed:>={}", window.since_date()));
        let issues = self.api.search_issues(&query, "updated", 1, self.search.per_page)?;
        log::info!("Checking close events of {} closed issues", issues.len());

        let candidates = issues
            .into_iter()
            .filter_map(|issue| match self.api.issue_events(issue.number) {
                Ok(events) => Some(ClosedIssueCandidate { issue, events }),
                Err(e) => {
                    log::warn!("Skipping issue #{}: events unavailable: {}", issue.number, e);
                    None
                }
            })
            .collect();
        Ok(candidates)
    }

    /// Pull requests the user reviewed at any time, with all of their reviews.
    pub fn search_prs_reviewed_by(&self) -> Result<Vec<ReviewedPullRequest>> {
        let query = self.query(&format!("is:pr reviewed-by:{}", self.username));
        let prs = self.search_paged(&query, "updated")?;
        log::info!("Found {} PRs reviewed by @{}", prs.len(), self.username);

        let reviewed = prs
            .into_iter()
            .filter_map(|pull_request| match self.api.pull_reviews(pull_request.number) {
                Ok(reviews) => Some(ReviewedPullRequest {
                    pull_request,
                    reviews,
                }),
                Err(e) => {
                    log::warn!(
                        "Skipping PR #{}: reviews unavailable: {}",
                        pull_request.number,
                        e
                    );
                    None
                }
            })
            .collect();
        Ok(reviewed)
    }

    /// Issues the user commented on at any time, with their comment threads.
    pub fn search_issues_commented_on(&self) -> Result<Vec<CommentedIssue>> {
        let query = self.query(&format!("is:issue commenter:{}", self.username));
        let issues = self.search_paged(&query, "updated")?;
        log::info!("Found {} issues commented on by @{}", issues.len(), self.username);

        let commented = issues
            .into_iter()
            .filter_map(|issue| match self.api.issue_comments(issue.number) {
                Ok(comments) => Some(CommentedIssue { issue, comments }),
                Err(e) => {
                    log::warn!("Skipping issue #{}: comments unavailable: {}", issue.number, e);
                    None
                }
            })
            .collect();
        Ok(commented)
    }

    /// Direct commits by the user since the window start.
    pub fn list_commits_by_author(&self, window: &ActivityWindow) -> Result<Vec<CommitItem>> {
        let commits = self
            .api
            .commits(&self.username, window.since, self.search.per_page)?;
        log::info!("Found {} commits by @{}", commits.len(), self.username);
        Ok(commits)
    }

    fn query(&self, qualifiers: &str) -> String {
        format!("repo:{} {}", self.repo_slug, qualifiers)
    }

    /// Collect search hits page by page, up to `search.max_pages`.
    fn search_paged(&self, query: &str, sort: &str) -> Result<Vec<SearchItem>> {
        let per_page = self.search.per_page;
        let mut items = Vec::new();

        for page in 1..=self.search.max_pages {
            match self.api.search_issues(query, sort, page, per_page) {
                Ok(batch) => {
                    log::debug!("Page {}: {} results for {:?}", page, batch.len(), query);
                    let last_page = batch.len() < per_page as usize;
                    items.extend(batch);
                    if last_page {
                        return Ok(items);
                    }
                }
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    log::warn!(
                        "Search page {} failed, keeping {} earlier results: {}",
                        page,
                        items.len(),
                        e
                    );
                    return Ok(items);
                }
            }
        }

        log::warn!(
            "Search stopped at the {}-page cap; results beyond {} items are not included",
            self.search.max_pages,
            items.len()
        );
        Ok(items)
    }
}
