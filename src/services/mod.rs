//! Service layer for the report tools.
//!
//! This module contains the business logic for:
//! - Activity aggregation (`ActivityAggregator`)
//! - Report metric recovery (`ReportMetricsScraper`)
//! - Team index grouping (`IndexAggregator`)

pub mod aggregator;
mod index;
mod metrics_scraper;

pub use aggregator::ActivityAggregator;
pub use index::IndexAggregator;
pub use metrics_scraper::{ReportMetricsScraper, ScrapedDocument, sidecar_path};
