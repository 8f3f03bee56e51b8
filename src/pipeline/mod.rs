//! Pipeline entry points for the report tools.
//!
//! - `run_report`: Fetch, aggregate and render one user's activity
//! - `run_team_index`: Build the team index from generated reports

pub mod index;
pub mod report;

pub use index::{IndexOutcome, run_team_index};
pub use report::{GeneratedReport, ReportRequest, run_report, write_report};
