//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Search pagination limits
    #[serde(default)]
    pub search: SearchConfig,

    /// Report rendering settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Team index locations
    #[serde(default)]
    pub team: TeamConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    ///
    /// A missing file is the normal case and is only logged at debug level.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {:?}. Using defaults.", path);
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.http.api_url)?;
        if self.search.per_page == 0 || self.search.per_page > 100 {
            return Err(AppError::validation("search.per_page must be within 1..=100"));
        }
        if self.search.max_pages == 0 {
            return Err(AppError::validation("search.max_pages must be > 0"));
        }
        if self.report.body_preview_chars == 0 {
            return Err(AppError::validation("report.body_preview_chars must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for API requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// API base URL used when neither flag nor environment overrides it
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Value of the `X-GitHub-Api-Version` header
    #[serde(default = "defaults::api_version")]
    pub api_version: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            api_url: defaults::api_url(),
            api_version: defaults::api_version(),
        }
    }
}

/// Search pagination limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Items requested per page
    #[serde(default = "defaults::per_page")]
    pub per_page: u32,

    /// Page cap for the reviewed-by and commenter searches
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page: defaults::per_page(),
            max_pages: defaults::max_pages(),
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Characters kept from review and comment bodies
    #[serde(default = "defaults::body_preview_chars")]
    pub body_preview_chars: usize,

    /// Characters of a comment shown in text and HTML reports
    #[serde(default = "defaults::comment_preview_chars")]
    pub comment_preview_chars: usize,

    /// Direct commits listed in the text report
    #[serde(default = "defaults::text_commit_limit")]
    pub text_commit_limit: usize,

    /// Direct commits listed in the HTML report
    #[serde(default = "defaults::html_commit_limit")]
    pub html_commit_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            body_preview_chars: defaults::body_preview_chars(),
            comment_preview_chars: defaults::comment_preview_chars(),
            text_commit_limit: defaults::text_commit_limit(),
            html_commit_limit: defaults::html_commit_limit(),
        }
    }
}

/// Team index input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Directory scanned for per-user HTML reports
    #[serde(default = "defaults::team_dir")]
    pub team_dir: PathBuf,

    /// Generated index document
    #[serde(default = "defaults::index_file")]
    pub index_file: PathBuf,

    /// Optional username to display name mapping (JSON object)
    #[serde(default = "defaults::display_names_file")]
    pub display_names_file: PathBuf,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            team_dir: defaults::team_dir(),
            index_file: defaults::index_file(),
            display_names_file: defaults::display_names_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        concat!("repo-activity/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn api_url() -> String {
        "https://api.github.com".into()
    }
    pub fn api_version() -> String {
        "2022-11-28".into()
    }

    // Search defaults
    pub fn per_page() -> u32 {
        100
    }
    pub fn max_pages() -> u32 {
        3
    }

    // Report defaults
    pub fn body_preview_chars() -> usize {
        200
    }
    pub fn comment_preview_chars() -> usize {
        100
    }
    pub fn text_commit_limit() -> usize {
        10
    }
    pub fn html_commit_limit() -> usize {
        15
    }

    // Team index defaults
    pub fn team_dir() -> PathBuf {
        PathBuf::from("reports/team")
    }
    pub fn index_file() -> PathBuf {
        PathBuf::from("reports/index.html")
    }
    pub fn display_names_file() -> PathBuf {
        PathBuf::from("user_names.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_page() {
        let mut config = Config::default();
        config.search.per_page = 250;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_api_url() {
        let mut config = Config::default();
        config.http.api_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[search]\nmax_pages = 5\n").unwrap();
        assert_eq!(config.search.max_pages, 5);
        assert_eq!(config.search.per_page, 100);
        assert_eq!(config.http.api_url, "https://api.github.com");
        assert_eq!(config.team.index_file, PathBuf::from("reports/index.html"));
    }

    #[test]
    fn load_or_default_falls_back_on_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search\nmax_pages = ").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.search.max_pages, 3);
    }
}
