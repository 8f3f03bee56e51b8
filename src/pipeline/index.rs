// src/pipeline/index.rs

//! Team index pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::models::TeamConfig;
use crate::report::index_page;
use crate::services::{IndexAggregator, ReportMetricsScraper};
use crate::utils::fs::{ensure_dir, relative_path, write_text};

const INDEX_FILE_NAME: &str = "index.html";

/// Result of an index run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Index written with this many reports
    Written { path: PathBuf, reports: usize },
    /// The team directory holds no report files
    NoInputFiles,
    /// Report files exist but none could be read
    NoValidReports,
}

/// Scan the team directory and write the index document.
pub fn run_team_index(team: &TeamConfig) -> Result<IndexOutcome> {
    ensure_dir(&team.team_dir)?;
    if let Some(parent) = team.index_file.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    log::info!("Scanning {} for reports...", team.team_dir.display());
    let files = report_files(&team.team_dir)?;
    if files.is_empty() {
        log::warn!(
            "No report files found in {}. Generate reports first.",
            team.team_dir.display()
        );
        return Ok(IndexOutcome::NoInputFiles);
    }
    log::info!("Found {} report(s)", files.len());

    let scraper = ReportMetricsScraper::new()?;
    let mut rows = Vec::new();
    for path in &files {
        log::debug!("Parsing {}", path.display());
        match scraper.read_report(path) {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => log::debug!("Skipping {}: not a report", path.display()),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    if rows.is_empty() {
        log::warn!("No valid reports could be parsed");
        return Ok(IndexOutcome::NoValidReports);
    }

    let display_names = IndexAggregator::load_display_names(&team.display_names_file);
    let index = IndexAggregator::new(display_names).build(rows);
    let reports = index.reports.len();

    let page = index_page::render(&index, &report_link_base(team), Local::now());
    write_text(&team.index_file, &page)?;
    log::info!(
        "Generated index with {} reports: {}",
        reports,
        team.index_file.display()
    );

    Ok(IndexOutcome::Written {
        path: team.index_file.clone(),
        reports,
    })
}

/// Location of the team directory as seen from the index document.
fn report_link_base(team: &TeamConfig) -> String {
    let index_dir = team.index_file.parent().unwrap_or(Path::new(""));
    let dir = relative_path(index_dir, &team.team_dir)
        .unwrap_or_else(|| team.team_dir.to_string_lossy().replace('\\', "/"));
    if dir.is_empty() { dir } else { format!("{dir}/") }
}

/// `*.html` files in `dir` except the index itself, in name order.
fn report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_html = path.extension().is_some_and(|ext| ext == "html");
        let is_index = path.file_name().is_some_and(|name| name == INDEX_FILE_NAME);
        if path.is_file() && is_html && !is_index {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportConfig;
    use crate::report::test_support::{context, stats};
    use crate::report::{self, ReportFormat};
    use tempfile::TempDir;

    fn team(dir: &TempDir) -> TeamConfig {
        TeamConfig {
            team_dir: dir.path().join("reports/team"),
            index_file: dir.path().join("reports/index.html"),
            display_names_file: dir.path().join("user_names.json"),
        }
    }

    #[test]
    fn test_empty_directory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let team = team(&dir);

        assert_eq!(run_team_index(&team).unwrap(), IndexOutcome::NoInputFiles);
        assert!(team.team_dir.is_dir());
        assert!(!team.index_file.exists());
    }

    #[test]
    fn test_unreadable_reports_write_nothing() {
        let dir = TempDir::new().unwrap();
        let team = team(&dir);
        write_text(&team.team_dir.join("junk.html"), "<p>nothing</p>").unwrap();

        assert_eq!(run_team_index(&team).unwrap(), IndexOutcome::NoValidReports);
        assert!(!team.index_file.exists());
    }

    #[test]
    fn test_index_lists_rendered_reports() {
        let dir = TempDir::new().unwrap();
        let team = team(&dir);
        let html = report::render(
            &stats(),
            &context(),
            ReportFormat::Html,
            &ReportConfig::default(),
        )
        .unwrap();
        write_text(&team.team_dir.join("alice-hello-2024-01-08.html"), &html).unwrap();
        write_text(&team.team_dir.join(INDEX_FILE_NAME), "<p>old index</p>").unwrap();
        write_text(&team.display_names_file, r#"{"alice": "Alice Liddell"}"#).unwrap();

        let outcome = run_team_index(&team).unwrap();
        assert_eq!(
            outcome,
            IndexOutcome::Written {
                path: team.index_file.clone(),
                reports: 1,
            }
        );

        let index = fs::read_to_string(&team.index_file).unwrap();
        assert!(index.contains("href=\"team/alice-hello-2024-01-08.html\""));
        assert!(index.contains("<td>Alice Liddell</td>"));
        assert!(index.contains("<td class=\"metric-cell\">2</td>"));
    }

    #[test]
    fn test_links_follow_configured_layout() {
        let dir = TempDir::new().unwrap();
        let team = TeamConfig {
            team_dir: dir.path().join("out/people"),
            index_file: dir.path().join("site/index.html"),
            display_names_file: dir.path().join("user_names.json"),
        };
        let html = report::render(
            &stats(),
            &context(),
            ReportFormat::Html,
            &ReportConfig::default(),
        )
        .unwrap();
        write_text(&team.team_dir.join("alice-hello-2024-01-08.html"), &html).unwrap();

        run_team_index(&team).unwrap();
        let index = fs::read_to_string(&team.index_file).unwrap();
        assert!(index.contains("href=\"../out/people/alice-hello-2024-01-08.html\""));
    }

    #[test]
    fn test_link_base_for_shared_directory() {
        let team = TeamConfig {
            team_dir: PathBuf::from("reports"),
            index_file: PathBuf::from("reports/index.html"),
            display_names_file: PathBuf::from("user_names.json"),
        };
        assert_eq!(report_link_base(&team), "");
        assert_eq!(report_link_base(&TeamConfig::default()), "team/");
    }
}
