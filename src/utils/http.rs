// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Media type requested from the GitHub API.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Create a configured blocking HTTP client.
///
/// Every request carries the API version header and, when a token is given,
/// a bearer `Authorization` header.
pub fn create_client(config: &HttpConfig, token: Option<&str>) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(default_headers(config, token)?)
        .build()?;
    Ok(client)
}

fn default_headers(config: &HttpConfig, token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_str(&config.api_version)
            .map_err(|e| AppError::config(format!("invalid api_version: {e}")))?,
    );
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AppError::config("token contains invalid header characters"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
