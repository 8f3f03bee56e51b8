//! Team index document.

use chrono::{DateTime, Local};

use crate::models::{ScrapedReportRow, TeamIndex, clean_metric_value, labels};
use crate::utils::escape_html;

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            padding: 40px 20px;
        }
        .container { max-width: 1400px; margin: 0 auto; }
        .header, .table-container {
            background: white;
            border-radius: 16px;
            box-shadow: 0 10px 40px rgba(0, 0, 0, 0.1);
            margin-bottom: 30px;
        }
        .header { padding: 40px; }
        .header h1 { font-size: 2.5em; color: #1f2937; margin-bottom: 10px; }
        .header p { font-size: 1.1em; color: #6b7280; }
        .stats {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-top: 20px;
        }
        .stat-card { background: #f3f4f6; padding: 20px; border-radius: 12px; text-align: center; }
        .stat-value { font-size: 2em; font-weight: bold; color: #667eea; }
        .stat-label { font-size: 0.9em; color: #6b7280; margin-top: 5px; }
        .table-container { padding: 30px; overflow-x: auto; }
        .table-container h2 { margin: 0 0 20px 0; color: #1f2937; font-size: 1.5em; }
        table { width: 100%; border-collapse: collapse; font-size: 0.95em; }
        thead { background: #f9fafb; position: sticky; top: 0; }
        th {
            padding: 16px 12px;
            text-align: left;
            font-weight: 600;
            color: #374151;
            border-bottom: 2px solid #e5e7eb;
            white-space: nowrap;
        }
        td { padding: 14px 12px; border-bottom: 1px solid #f3f4f6; color: #1f2937; }
        tbody tr:hover { background: #f9fafb; }
        .username-link { color: #667eea; text-decoration: none; font-weight: 600; }
        .username-link:hover { color: #764ba2; text-decoration: underline; }
        .metric-cell { text-align: center; font-family: 'SF Mono', Monaco, monospace; font-size: 0.9em; }
        .date-cell { font-weight: 500; color: #4b5563; }
        .repo-cell { font-family: 'SF Mono', Monaco, monospace; font-size: 0.9em; color: #6b7280; }
        .positive { color: #10b981; }
        .negative { color: #ef4444; }
        .footer { text-align: center; color: white; margin-top: 30px; opacity: 0.9; font-size: 0.9em; }
        @media (max-width: 768px) {
            .header h1 { font-size: 1.8em; }
            table { font-size: 0.85em; }
            th, td { padding: 10px 8px; }
        }
"#;

const DETAIL_COLUMNS: [&str; 11] = [
    "Date",
    "Username",
    "Repository",
    "PRs Merged",
    "Reviews",
    "Issues Opened",
    "Issues Closed",
    "Comments",
    "Commits",
    "Lines +",
    "Lines -",
];

const SUMMARY_COLUMNS: [&str; 4] = ["Date", "Username", "Real Name", "Total PRs Merged"];

/// Render the index page.
///
/// Report links are `report_base` followed by the report file name, so
/// `report_base` is empty or ends with `/`.
pub fn render(index: &TeamIndex, report_base: &str, generated_at: DateTime<Local>) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("    <meta charset=\"UTF-8\">\n");
    output.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    output.push_str("    <title>Team Activity Reports Index</title>\n");
    output.push_str(&format!("    <style>{}    </style>\n", STYLE));
    output.push_str("</head>\n<body>\n    <div class=\"container\">\n");

    render_header(&mut output, index);
    render_summary(&mut output, index);
    render_details(&mut output, &index.reports, report_base);

    output.push_str("        <div class=\"footer\">\n");
    output.push_str(&format!(
        "            <p>Generated on {} | Click username to view detailed report</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    output.push_str("        </div>\n    </div>\n</body>\n</html>\n");
    output
}

fn render_header(output: &mut String, index: &TeamIndex) {
    output.push_str("        <div class=\"header\">\n");
    output.push_str("            <h1>📊 Team Activity Reports</h1>\n");
    output.push_str("            <p>Activity metrics from all generated team reports</p>\n");
    output.push_str("            <div class=\"stats\">\n");
    for (value, label) in [
        (index.reports.len(), "Total Reports"),
        (index.unique_users, "Team Members"),
        (index.unique_repos, "Repositories"),
    ] {
        output.push_str("                <div class=\"stat-card\">\n");
        output.push_str(&format!(
            "                    <div class=\"stat-value\">{}</div>\n",
            value
        ));
        output.push_str(&format!(
            "                    <div class=\"stat-label\">{}</div>\n",
            label
        ));
        output.push_str("                </div>\n");
    }
    output.push_str("            </div>\n        </div>\n");
}

fn open_table(output: &mut String, title: &str, columns: &[&str]) {
    output.push_str("        <div class=\"table-container\">\n");
    output.push_str(&format!("            <h2>{}</h2>\n", title));
    output.push_str("            <table>\n                <thead>\n                    <tr>\n");
    for column in columns {
        output.push_str(&format!("                        <th>{}</th>\n", column));
    }
    output.push_str("                    </tr>\n                </thead>\n                <tbody>\n");
}

fn close_table(output: &mut String) {
    output.push_str("                </tbody>\n            </table>\n        </div>\n");
}

fn cell(output: &mut String, class: &str, content: &str) {
    if class.is_empty() {
        output.push_str(&format!("                        <td>{}</td>\n", content));
    } else {
        output.push_str(&format!(
            "                        <td class=\"{}\">{}</td>\n",
            class, content
        ));
    }
}

fn render_summary(output: &mut String, index: &TeamIndex) {
    open_table(output, "Summary by User", &SUMMARY_COLUMNS);
    for row in &index.summary {
        output.push_str("                    <tr>\n");
        cell(output, "date-cell", &escape_html(&row.most_recent_date));
        cell(output, "", &format!("@{}", escape_html(&row.username)));
        cell(output, "", &escape_html(&row.display_name));
        cell(output, "metric-cell", &row.total_prs_merged.to_string());
        output.push_str("                    </tr>\n");
    }
    close_table(output);
}

/// Comment count, falling back to any label mentioning comments.
fn comments_value(row: &ScrapedReportRow) -> String {
    row.metric(labels::ISSUE_COMMENTS)
        .or_else(|| row.metric(labels::COMMENTS))
        .map(clean_metric_value)
        .unwrap_or_else(|| "0".to_string())
}

fn render_details(output: &mut String, reports: &[ScrapedReportRow], report_base: &str) {
    open_table(output, "Individual Reports (7 days per repo)", &DETAIL_COLUMNS);
    for row in reports {
        output.push_str("                    <tr>\n");
        cell(output, "date-cell", &escape_html(&row.report_date));
        cell(
            output,
            "",
            &format!(
                "<a href=\"{}{}\" class=\"username-link\">@{}</a>",
                escape_html(report_base),
                escape_html(&row.filename),
                escape_html(&row.username)
            ),
        );
        cell(output, "repo-cell", &escape_html(&row.repo));
        cell(output, "metric-cell", &row.metric_display(labels::PRS_MERGED));
        cell(output, "metric-cell", &row.metric_display(labels::REVIEWS_GIVEN));
        cell(output, "metric-cell", &row.metric_display(labels::ISSUES_OPENED));
        cell(output, "metric-cell", &row.metric_display(labels::ISSUES_CLOSED));
        cell(output, "metric-cell", &comments_value(row));
        cell(output, "metric-cell", &row.metric_display(labels::COMMITS));
        cell(
            output,
            "metric-cell positive",
            &row.metric_display(labels::LINES_ADDED),
        );
        cell(
            output,
            "metric-cell negative",
            &row.metric_display(labels::LINES_DELETED),
        );
        output.push_str("                    </tr>\n");
    }
    close_table(output);
}
