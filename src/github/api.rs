//! Repository-scoped GitHub API transport.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::github::types::{
    CommitItem, IssueComment, IssueEvent, PullRequestDetail, Review, SearchItem, SearchPage,
};

/// Endpoints the activity client needs, scoped to one repository.
///
/// Every method performs exactly one request; paging and fan-out are the
/// caller's business.
pub trait RepoApi {
    /// One page of `GET /search/issues`, newest first by `sort`.
    fn search_issues(
        &self,
        query: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SearchItem>>;

    fn pull_request(&self, number: u64) -> Result<PullRequestDetail>;

    fn pull_reviews(&self, number: u64) -> Result<Vec<Review>>;

    fn issue_events(&self, number: u64) -> Result<Vec<IssueEvent>>;

    fn issue_comments(&self, number: u64) -> Result<Vec<IssueComment>>;

    /// First page of commits by `author` since the given instant.
    fn commits(&self, author: &str, since: DateTime<Utc>, per_page: u32)
    -> Result<Vec<CommitItem>>;
}

/// `RepoApi` over a blocking reqwest client.
pub struct HttpRepoApi {
    client: Client,
    base_url: Url,
    owner: String,
    repo: String,
}

impl HttpRepoApi {
    /// Create an API handle for `owner/repo` rooted at `api_url`.
    pub fn new(
        client: Client,
        api_url: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(api_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!("API URL cannot be a base: {api_url}")));
        }
        Ok(Self {
            client,
            base_url,
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config("API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint(&self, tail: &[&str]) -> Result<Url> {
        let mut segments = vec!["repos", self.owner.as_str(), self.repo.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let context = url.path().to_string();
        log::debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::debug!("{} answered {}: {}", context, status, body);
            return Err(AppError::api(context, status.as_u16()));
        }
        Ok(response.json()?)
    }
}

impl RepoApi for HttpRepoApi {
    fn search_issues(
        &self,
        query: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SearchItem>> {
        let url = self.endpoint(&["search", "issues"])?;
        let params = [
            ("q", query.to_string()),
            ("sort", sort.to_string()),
            ("order", "desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let page: SearchPage = self.get_json(url, &params)?;
        Ok(page.items)
    }

    fn pull_request(&self, number: u64) -> Result<PullRequestDetail> {
        let number = number.to_string();
        let url = self.repo_endpoint(&["pulls", &number])?;
        self.get_json(url, &[])
    }

    fn pull_reviews(&self, number: u64) -> Result<Vec<Review>> {
        let number = number.to_string();
        let url = self.repo_endpoint(&["pulls", &number, "reviews"])?;
        self.get_json(url, &[])
    }

    fn issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        let number = number.to_string();
        let url = self.repo_endpoint(&["issues", &number, "events"])?;
        self.get_json(url, &[])
    }

    fn issue_comments(&self, number: u64) -> Result<Vec<IssueComment>> {
        let number = number.to_string();
        let url = self.repo_endpoint(&["issues", &number, "comments"])?;
        self.get_json(url, &[])
    }

    fn commits(
        &self,
        author: &str,
        since: DateTime<Utc>,
        per_page: u32,
    ) -> Result<Vec<CommitItem>> {
        let url = self.repo_endpoint(&["commits"])?;
        let params = [
            ("author", author.to_string()),
            ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("per_page", per_page.to_string()),
        ];
        self.get_json(url, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpRepoApi {
        HttpRepoApi::new(Client::new(), base, "octo", "hello-world").unwrap()
    }

    #[test]
    fn test_endpoint_on_public_api() {
        let api = api("https://api.github.com");
        assert_eq!(
            api.endpoint(&["search", "issues"]).unwrap().as_str(),
            "https://api.github.com/search/issues"
        );
        assert_eq!(
            api.repo_endpoint(&["pulls", "12", "reviews"]).unwrap().as_str(),
            "https://api.github.com/repos/octo/hello-world/pulls/12/reviews"
        );
    }

    #[test]
    fn test_endpoint_keeps_enterprise_prefix() {
        let api = api("https://github.example.com/api/v3/");
        assert_eq!(
            api.repo_endpoint(&["commits"]).unwrap().as_str(),
            "https://github.example.com/api/v3/repos/octo/hello-world/commits"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(HttpRepoApi::new(Client::new(), "mailto:x@example.com", "o", "r").is_err());
        assert!(HttpRepoApi::new(Client::new(), "::", "o", "r").is_err());
    }
}
