//! Recover report metrics from generated HTML reports.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{ReportMetrics, ScrapedReportRow};
use crate::utils::fs::load_json;

const REPO_SELECTOR: &str = "div.repo";
const USERNAME_SELECTOR: &str = "div.username";
const CARD_SELECTOR: &str = "div.metric-card";
const LABEL_SELECTOR: &str = "div.metric-label";
const VALUE_SELECTOR: &str = "div.metric-value";

/// Identity and metrics found in one report document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedDocument {
    pub username: String,
    pub repo: String,
    pub metrics: IndexMap<String, String>,
}

/// Reads per-user reports back for the team index.
pub struct ReportMetricsScraper {
    repo_sel: Selector,
    username_sel: Selector,
    card_sel: Selector,
    label_sel: Selector,
    value_sel: Selector,
    date_re: Regex,
}

impl ReportMetricsScraper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            repo_sel: Self::parse_selector(REPO_SELECTOR)?,
            username_sel: Self::parse_selector(USERNAME_SELECTOR)?,
            card_sel: Self::parse_selector(CARD_SELECTOR)?,
            label_sel: Self::parse_selector(LABEL_SELECTOR)?,
            value_sel: Self::parse_selector(VALUE_SELECTOR)?,
            date_re: Regex::new(r"\d{4}-\d{2}-\d{2}")
                .map_err(|e| AppError::validation(format!("date pattern: {e}")))?,
        })
    }

    /// Load one report, preferring its metrics sidecar over the markup.
    ///
    /// `Ok(None)` means the file is not a recognizable report.
    pub fn read_report(&self, path: &Path) -> Result<Option<ScrapedReportRow>> {
        if let Some(sidecar) = self.load_sidecar(path) {
            log::debug!("Using metrics sidecar for {}", path.display());
            return Ok(Some(ScrapedReportRow {
                filename: file_name(path),
                report_date: self.report_date(path)?,
                username: sidecar.username,
                repo: sidecar.repo,
                metrics: sidecar.metrics,
            }));
        }
        self.scrape_file(path)
    }

    /// Scrape an HTML report file.
    pub fn scrape_file(&self, path: &Path) -> Result<Option<ScrapedReportRow>> {
        let html = fs::read_to_string(path)?;
        let Some(document) = self.scrape_document(&html) else {
            log::debug!("No report markers in {}", path.display());
            return Ok(None);
        };

        Ok(Some(ScrapedReportRow {
            filename: file_name(path),
            report_date: self.report_date(path)?,
            username: document.username,
            repo: document.repo,
            metrics: document.metrics,
        }))
    }

    /// Extract identity and metric cards; `None` without a username or an
    /// `owner/name` repository marker.
    ///
    /// With several username markers the first non-empty one wins.
    pub fn scrape_document(&self, html: &str) -> Option<ScrapedDocument> {
        let document = Html::parse_document(html);

        let repo = document
            .select(&self.repo_sel)
            .map(|el| element_text(&el))
            .find(|text| is_repo_slug(text))?;

        let username = document
            .select(&self.username_sel)
            .map(|el| element_text(&el).trim_start_matches('@').to_string())
            .find(|name| !name.is_empty())?;

        let mut metrics = IndexMap::new();
        for card in document.select(&self.card_sel) {
            let label = card.select(&self.label_sel).next().map(|el| element_text(&el));
            let value = card.select(&self.value_sel).next().map(|el| element_text(&el));
            if let (Some(label), Some(value)) = (label, value) {
                if !label.is_empty() && !value.is_empty() {
                    metrics.insert(label, value);
                }
            }
        }

        Some(ScrapedDocument {
            username,
            repo,
            metrics,
        })
    }

    /// First `YYYY-MM-DD` in the file stem.
    pub fn date_from_name(&self, path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        self.date_re.find(stem).map(|m| m.as_str().to_string())
    }

    /// Date from the file name, else the file's modification date.
    fn report_date(&self, path: &Path) -> Result<String> {
        match self.date_from_name(path) {
            Some(date) => Ok(date),
            None => modified_date(path),
        }
    }

    fn load_sidecar(&self, html_path: &Path) -> Option<ReportMetrics> {
        let sidecar = sidecar_path(html_path);
        if !sidecar.exists() {
            return None;
        }
        match load_json::<ReportMetrics>(&sidecar) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable metrics sidecar {}: {}",
                    sidecar.display(),
                    e
                );
                None
            }
        }
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

/// `X.html` -> `X.metrics.json`
pub fn sidecar_path(html_path: &Path) -> std::path::PathBuf {
    html_path.with_extension("metrics.json")
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn is_repo_slug(text: &str) -> bool {
    let mut parts = text.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn modified_date(path: &Path) -> Result<String> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportConfig;
    use crate::report::test_support::{context, stats};
    use crate::report::{self, ReportFormat};
    use crate::utils::fs::{save_json, write_text};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn scraper() -> ReportMetricsScraper {
        ReportMetricsScraper::new().unwrap()
    }

    #[test]
    fn test_render_then_scrape_round_trip() {
        let html = report::render(
            &stats(),
            &context(),
            ReportFormat::Html,
            &ReportConfig::default(),
        )
        .unwrap();

        let document = scraper().scrape_document(&html).unwrap();
        assert_eq!(document.username, "alice");
        assert_eq!(document.repo, "octo/hello");
        assert_eq!(
            document.metrics.get("✅ PRs Merged").map(String::as_str),
            Some("2")
        );
        assert_eq!(document.metrics.len(), 8);
    }

    #[test]
    fn test_scrape_matches_sidecar() {
        let stats = stats();
        let context = context();
        let html =
            report::render(&stats, &context, ReportFormat::Html, &ReportConfig::default()).unwrap();

        let scraped = scraper().scrape_document(&html).unwrap();
        let sidecar = report::sidecar_metrics(&stats, &context);
        assert_eq!(scraped.metrics, sidecar.metrics);
    }

    #[test]
    fn test_missing_markers_yield_none() {
        let scraper = scraper();
        assert!(scraper.scrape_document("<html><body>hello</body></html>").is_none());
        assert!(
            scraper
                .scrape_document(r#"<div class="repo">octo/hello</div>"#)
                .is_none()
        );
        assert!(
            scraper
                .scrape_document(r#"<div class="repo">no-slash</div><div class="username">@a</div>"#)
                .is_none()
        );
    }

    #[test]
    fn test_date_from_name() {
        let scraper = scraper();
        assert_eq!(
            scraper.date_from_name(Path::new("alice-hello-2024-01-08.html")),
            Some("2024-01-08".to_string())
        );
        assert_eq!(scraper.date_from_name(Path::new("alice.html")), None);
    }

    #[test]
    fn test_scrape_file_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.html");
        write_text(
            &path,
            r#"<div class="repo">octo/hello</div><div class="username">@alice</div>"#,
        )
        .unwrap();

        let row = scraper().scrape_file(&path).unwrap().unwrap();
        assert_eq!(row.filename, "alice.html");
        assert_eq!(row.report_date, Local::now().format("%Y-%m-%d").to_string());
        assert!(row.metrics.is_empty());
    }

    #[test]
    fn test_sidecar_is_preferred() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice-hello-2024-01-08.html");
        write_text(&path, "<html>not a report</html>").unwrap();
        save_json(
            &sidecar_path(&path),
            &report::sidecar_metrics(&stats(), &context()),
        )
        .unwrap();

        let row = scraper().read_report(&path).unwrap().unwrap();
        assert_eq!(row.username, "alice");
        assert_eq!(row.report_date, "2024-01-08");
        assert_eq!(row.metric_count("PRs Merged"), 2);
    }

    #[test]
    fn test_sidecar_date_follows_file_not_window() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.html");
        write_text(
            &path,
            r#"<div class="repo">octo/hello</div><div class="username">@alice</div>"#,
        )
        .unwrap();
        let metrics = report::sidecar_metrics(&stats(), &context());
        assert_eq!(metrics.report_date, "2024-01-08");
        save_json(&sidecar_path(&path), &metrics).unwrap();

        let scraper = scraper();
        let from_sidecar = scraper.read_report(&path).unwrap().unwrap();
        let from_markup = scraper.scrape_file(&path).unwrap().unwrap();
        assert_eq!(from_sidecar.report_date, from_markup.report_date);
        assert_eq!(
            from_sidecar.report_date,
            Local::now().format("%Y-%m-%d").to_string()
        );
        assert_eq!(from_sidecar.metric_count("PRs Merged"), 2);
    }

    #[test]
    fn test_first_username_marker_wins() {
        let document = scraper()
            .scrape_document(
                r#"<div class="repo">octo/hello</div>
                <div class="username"></div>
                <div class="username">@alice</div>
                <div class="username">@bob</div>"#,
            )
            .unwrap();
        assert_eq!(document.username, "alice");
    }

    #[test]
    fn test_broken_sidecar_falls_back_to_markup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bob-2024-02-01.html");
        write_text(
            &path,
            r#"<div class="repo">octo/hello</div><div class="username">@bob</div>"#,
        )
        .unwrap();
        write_text(&sidecar_path(&path), "{ nope").unwrap();

        let row = scraper().read_report(&path).unwrap().unwrap();
        assert_eq!(row.username, "bob");
    }
}
