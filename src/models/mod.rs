// src/models/mod.rs

//! Domain models for the report tools.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod activity;
mod config;
mod report;

// Re-export all public types
pub use activity::{
    ActivityCategory, ActivityStatistics, ActivityWindow, ClosedIssueRecord, CommitRecord,
    IssueCommentRecord, IssueRecord, ItemState, PrOutcome, PullRequestRecord, ReviewRecord,
    SizeClass, SizeDistribution,
};
pub use config::{Config, HttpConfig, ReportConfig, SearchConfig, TeamConfig};
pub use report::{
    ReportMetrics, ScrapedReportRow, TeamIndex, UserSummaryRow, clean_metric_value, labels,
    metric_count,
};
