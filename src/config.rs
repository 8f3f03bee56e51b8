// src/config.rs

//! Run-time settings resolved from flags, environment and the config file.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::Config;

pub const API_URL_ENV: &str = "GITHUB_API_URL";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const ENTERPRISE_TOKEN_ENV: &str = "GITHUB_ENTERPRISE_TOKEN";

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "repo-activity.toml";

/// API endpoint and token for a report run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_url: String,
    pub token: Option<String>,
    /// Whether the API URL came from a flag or the environment
    pub custom_api: bool,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("custom_api", &self.custom_api)
            .finish()
    }
}

/// Resolve API URL and token.
///
/// URL: flag, then `GITHUB_API_URL`, then the configured default. Token:
/// flag, then (for a custom API URL) `GITHUB_ENTERPRISE_TOKEN` followed by
/// `GITHUB_TOKEN`, otherwise `GITHUB_TOKEN` alone.
pub fn resolve_credentials(
    token_flag: Option<&str>,
    api_url_flag: Option<&str>,
    default_api_url: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Credentials {
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let custom_url =
        non_empty(api_url_flag.map(str::to_string)).or_else(|| non_empty(env(API_URL_ENV)));
    let custom_api = custom_url.is_some();
    let api_url = custom_url.unwrap_or_else(|| default_api_url.to_string());

    let token = non_empty(token_flag.map(str::to_string)).or_else(|| {
        if custom_api {
            non_empty(env(ENTERPRISE_TOKEN_ENV)).or_else(|| non_empty(env(TOKEN_ENV)))
        } else {
            non_empty(env(TOKEN_ENV))
        }
    });

    Credentials {
        api_url,
        token,
        custom_api,
    }
}

/// Parse a `YYYY-MM-DD` end date.
pub fn parse_end_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| AppError::invalid_date(value))
}

/// Load the config file (defaults when absent) and validate it.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        // an explicitly named file must load
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(DEFAULT_CONFIG_FILE),
    };
    config.validate()?;
    Ok(config)
}
