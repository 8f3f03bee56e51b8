//! GitHub API access.
//!
//! - `api`: one-request-per-call transport (`RepoApi`, `HttpRepoApi`)
//! - `client`: per-category queries with paging and per-item fan-out
//! - `types`: wire payloads

pub mod api;
pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{HttpRepoApi, RepoApi};
pub use client::RemoteRepoClient;
