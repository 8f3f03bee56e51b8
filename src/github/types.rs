//! Wire payloads returned by the GitHub REST and search endpoints.
//!
//! Only the fields the aggregator reads are declared; everything else in the
//! response is ignored by serde.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::ItemState;

/// A user reference (`user`, `actor`) on an API object.
#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

impl Actor {
    /// Logins compare case-insensitively.
    pub fn is(&self, username: &str) -> bool {
        self.login.eq_ignore_ascii_case(username)
    }
}

/// Envelope of `GET /search/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// An issue or pull request hit from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: ItemState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Comment count
    #[serde(default)]
    pub comments: u64,
}

/// `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDetail {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: ItemState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changed_files: u64,
    #[serde(default)]
    pub commits: u64,
}

/// An entry of `GET /repos/{owner}/{repo}/pulls/{number}/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub user: Option<Actor>,
    pub state: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: Option<String>,
}

/// An entry of `GET /repos/{owner}/{repo}/issues/{number}/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    pub event: String,
    #[serde(default)]
    pub actor: Option<Actor>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An entry of `GET /repos/{owner}/{repo}/issues/{number}/comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    #[serde(default)]
    pub user: Option<Actor>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub body: Option<String>,
}

/// An entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitItem {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// A closed issue together with its event history.
#[derive(Debug, Clone)]
pub struct ClosedIssueCandidate {
    pub issue: SearchItem,
    pub events: Vec<IssueEvent>,
}

/// A pull request the user reviewed, with every review on it.
#[derive(Debug, Clone)]
pub struct ReviewedPullRequest {
    pub pull_request: SearchItem,
    pub reviews: Vec<Review>,
}

/// An issue the user commented on, with its full comment thread.
#[derive(Debug, Clone)]
pub struct CommentedIssue {
    pub issue: SearchItem,
    pub comments: Vec<IssueComment>,
}
