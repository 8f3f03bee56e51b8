//! In-memory `RepoApi` used by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::github::api::RepoApi;
use crate::github::types::{
    Actor, CommitDetail, CommitItem, CommitSignature, IssueComment, IssueEvent, PullRequestDetail,
    Review, SearchItem,
};
use crate::models::ItemState;

pub(crate) fn ts(value: &str) -> DateTime<Utc> {
    value.parse().expect("valid RFC 3339 timestamp")
}

#[derive(Default)]
pub(crate) struct FakeRepoApi {
    /// (query substring, every hit for that query)
    searches: Vec<(String, Vec<SearchItem>)>,
    /// (query substring, failing page or every page)
    failing_searches: Vec<(String, Option<u32>)>,
    pub pulls: HashMap<u64, PullRequestDetail>,
    pub reviews: HashMap<u64, Vec<Review>>,
    pub events: HashMap<u64, Vec<IssueEvent>>,
    pub comments: HashMap<u64, Vec<IssueComment>>,
    /// Item numbers whose list endpoints (reviews, events, comments) fail
    pub failing_items: HashSet<u64>,
    pub commits: Vec<CommitItem>,
    pub fail_commits: bool,
    search_calls: RefCell<Vec<(String, u32)>>,
    commit_calls: RefCell<Vec<(String, DateTime<Utc>)>>,
}

impl FakeRepoApi {
    pub fn add_search(&mut self, query_part: &str, items: Vec<SearchItem>) {
        self.searches.push((query_part.to_string(), items));
    }

    pub fn fail_search(&mut self, query_part: &str) {
        self.failing_searches.push((query_part.to_string(), None));
    }

    pub fn fail_search_page(&mut self, query_part: &str, page: u32) {
        self.failing_searches.push((query_part.to_string(), Some(page)));
    }

    pub fn add_pull(&mut self, pull: PullRequestDetail) {
        self.pulls.insert(pull.number, pull);
    }

    pub fn searched_queries(&self) -> Vec<String> {
        self.search_calls.borrow().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn searched_pages(&self) -> Vec<u32> {
        self.search_calls.borrow().iter().map(|(_, p)| *p).collect()
    }

    pub fn commit_queries(&self) -> Vec<(String, DateTime<Utc>)> {
        self.commit_calls.borrow().clone()
    }

    fn list<T: Clone>(&self, map: &HashMap<u64, Vec<T>>, number: u64, what: &str) -> Result<Vec<T>> {
        if self.failing_items.contains(&number) {
            return Err(AppError::api(format!("{what} #{number}"), 502));
        }
        Ok(map.get(&number).cloned().unwrap_or_default())
    }
}

impl RepoApi for FakeRepoApi {
    fn search_issues(
        &self,
        query: &str,
        _sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SearchItem>> {
        self.search_calls
            .borrow_mut()
            .push((query.to_string(), page));

        let failing = self.failing_searches.iter().any(|(part, failing_page)| {
            query.contains(part.as_str()) && failing_page.is_none_or(|p| p == page)
        });
        if failing {
            return Err(AppError::api("/search/issues", 500));
        }

        let hits = self
            .searches
            .iter()
            .find(|(part, _)| query.contains(part.as_str()))
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default();
        let start = ((page - 1) * per_page) as usize;
        let end = (start + per_page as usize).min(hits.len());
        Ok(hits.get(start..end).map(<[_]>::to_vec).unwrap_or_default())
    }

    fn pull_request(&self, number: u64) -> Result<PullRequestDetail> {
        self.pulls
            .get(&number)
            .cloned()
            .ok_or_else(|| AppError::api(format!("pull #{number}"), 404))
    }

    fn pull_reviews(&self, number: u64) -> Result<Vec<Review>> {
        self.list(&self.reviews, number, "reviews")
    }

    fn issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        self.list(&self.events, number, "events")
    }

    fn issue_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        self.list(&self.comments, number, "comments")
    }

    fn commits(
        &self,
        author: &str,
        since: DateTime<Utc>,
        _per_page: u32,
    ) -> Result<Vec<CommitItem>> {
        self.commit_calls
            .borrow_mut()
            .push((author.to_string(), since));
        if self.fail_commits {
            return Err(AppError::api("/commits", 409));
        }
        Ok(self.commits.clone())
    }
}

pub(crate) fn item(number: u64) -> SearchItem {
    SearchItem {
        number,
        title: format!("Item {number}"),
        html_url: format!("https://github.com/octo/hello/issues/{number}"),
        state: ItemState::Open,
        created_at: Some(ts("2024-01-03T12:00:00Z")),
        closed_at: None,
        comments: 1,
    }
}

pub(crate) fn closed_item(number: u64) -> SearchItem {
    SearchItem {
        state: ItemState::Closed,
        closed_at: Some(ts("2024-01-05T12:00:00Z")),
        ..item(number)
    }
}

/// Pull request detail; closed when `merged_at` is given.
pub(crate) fn pull(
    number: u64,
    additions: u64,
    deletions: u64,
    merged_at: Option<&str>,
) -> PullRequestDetail {
    PullRequestDetail {
        number,
        title: format!("PR {number}"),
        html_url: format!("https://github.com/octo/hello/pull/{number}"),
        state: if merged_at.is_some() {
            ItemState::Closed
        } else {
            ItemState::Open
        },
        created_at: ts("2024-01-02T09:00:00Z"),
        merged_at: merged_at.map(ts),
        closed_at: merged_at.map(ts),
        additions,
        deletions,
        changed_files: 2,
        commits: 3,
    }
}

/// Pull request closed without merging.
pub(crate) fn rejected_pull(number: u64, additions: u64, deletions: u64) -> PullRequestDetail {
    PullRequestDetail {
        state: ItemState::Closed,
        closed_at: Some(ts("2024-01-04T09:00:00Z")),
        ..pull(number, additions, deletions, None)
    }
}

fn actor(login: &str) -> Option<Actor> {
    Some(Actor {
        login: login.to_string(),
    })
}

pub(crate) fn review(login: &str, state: &str, submitted_at: Option<&str>) -> Review {
    Review {
        user: actor(login),
        state: state.to_string(),
        submitted_at: submitted_at.map(ts),
        body: Some(format!("{state} by {login}")),
    }
}

pub(crate) fn event(kind: &str, login: &str, at: &str) -> IssueEvent {
    IssueEvent {
        event: kind.to_string(),
        actor: actor(login),
        created_at: Some(ts(at)),
    }
}

pub(crate) fn comment(login: &str, at: &str, body: &str) -> IssueComment {
    IssueComment {
        user: actor(login),
        created_at: ts(at),
        body: Some(body.to_string()),
    }
}

pub(crate) fn commit(sha: &str, message: &str) -> CommitItem {
    CommitItem {
        sha: sha.to_string(),
        html_url: format!("https://github.com/octo/hello/commit/{sha}"),
        commit: CommitDetail {
            message: message.to_string(),
            author: Some(CommitSignature {
                date: Some(ts("2024-01-06T08:30:00Z")),
            }),
        },
    }
}
