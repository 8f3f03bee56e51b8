//! Self-contained HTML report.
//!
//! The team index reads `div.repo`, `div.username` and the
//! `div.metric-card` label/value pairs back out of this document, so those
//! class names are part of the output contract.

use chrono::{DateTime, Utc};

use crate::models::{ActivityStatistics, ItemState, PrOutcome, ReportConfig, SizeClass};
use crate::report::{MetricCard, ReportContext, ReportSummary};
use crate::utils::{escape_html, preview_with_ellipsis};

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #24292f;
            background: linear-gradient(135deg, #f6f8fa 0%, #ffffff 100%);
            padding: 20px;
        }
        .container {
            max-width: 1200px;
            margin: 0 auto;
            background: white;
            border-radius: 12px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
            overflow: hidden;
        }
        .header {
            background: linear-gradient(135deg, #0366d6 0%, #0969da 100%);
            color: white;
            padding: 40px;
            text-align: center;
        }
        .header h1 { font-size: 2.5em; margin-bottom: 10px; font-weight: 700; }
        .header .repo { font-size: 1.5em; margin-bottom: 10px; font-family: 'Monaco', monospace; }
        .header .username { font-size: 1.3em; margin-bottom: 15px; opacity: 0.9; }
        .header .meta { font-size: 0.95em; opacity: 0.85; }
        .notice { background: #fff8c5; padding: 15px 40px; color: #7d4e00; }
        .metrics-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            padding: 40px;
            background: #f8f9fa;
        }
        .metric-card {
            background: white;
            padding: 25px;
            border-radius: 10px;
            text-align: center;
            border: 2px solid #e9ecef;
        }
        .metric-card.highlight { background: #fff3b0; }
        .metric-value { font-size: 3em; font-weight: 700; margin: 10px 0; color: #0366d6; }
        .metric-label {
            color: #6c757d;
            font-size: 0.95em;
            text-transform: uppercase;
            letter-spacing: 1px;
            font-weight: 600;
        }
        .section { padding: 40px; }
        .section-title {
            font-size: 1.8em;
            margin-bottom: 25px;
            color: #1f2937;
            border-bottom: 3px solid #0366d6;
            padding-bottom: 10px;
        }
        .section-note { color: #6c757d; margin-bottom: 20px; font-size: 0.95em; font-style: italic; }
        .pr-card {
            border: 1px solid #e9ecef;
            border-radius: 8px;
            padding: 20px;
            margin-bottom: 20px;
        }
        .pr-title { font-size: 1.2em; font-weight: 600; margin-bottom: 10px; }
        .pr-number { color: #0366d6; font-weight: 700; }
        .pr-stats {
            display: flex;
            gap: 20px;
            margin-top: 15px;
            padding-top: 15px;
            border-top: 1px solid #e9ecef;
            flex-wrap: wrap;
            font-size: 0.9em;
        }
        .stat-additions { color: #22c55e; font-weight: 600; }
        .stat-deletions { color: #ef4444; font-weight: 600; }
        .pr-link { color: #0366d6; text-decoration: none; font-weight: 500; }
        .pr-link:hover { text-decoration: underline; }
        .comment-preview {
            margin-top: 10px;
            padding: 10px;
            background: #f8f9fa;
            border-radius: 4px;
            font-size: 0.9em;
            color: #495057;
        }
        .badge {
            display: inline-block;
            padding: 4px 12px;
            border-radius: 12px;
            font-size: 0.85em;
            font-weight: 600;
            text-transform: uppercase;
        }
        .badge-merged, .badge-approved { background: #dcfce7; color: #16a34a; }
        .badge-open, .badge-commented { background: #dbeafe; color: #2563eb; }
        .badge-closed, .badge-changes-requested { background: #fee2e2; color: #dc2626; }
        .badge-size { font-size: 0.75em; padding: 3px 8px; margin-left: 8px; }
        .badge-xs { background: #d1fae5; color: #059669; }
        .badge-s { background: #dbeafe; color: #2563eb; }
        .badge-m { background: #fef3c7; color: #d97706; }
        .badge-l { background: #ffedd5; color: #ea580c; }
        .badge-xl { background: #fee2e2; color: #dc2626; }
        .badge-xxl { background: #fecaca; color: #7f1d1d; font-weight: 700; }
        .pr-size-chart {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
            gap: 15px;
        }
        .size-card {
            padding: 20px;
            border-radius: 8px;
            text-align: center;
            border: 2px solid #e9ecef;
        }
        .size-value { font-size: 2.5em; font-weight: 700; margin: 5px 0; }
        .size-description { font-size: 0.75em; color: #6c757d; margin-top: 5px; }
        .commit-list { background: #f8f9fa; border-radius: 8px; padding: 20px; }
        .commit-item {
            padding: 10px;
            border-left: 3px solid #0366d6;
            margin-bottom: 10px;
            background: white;
            border-radius: 4px;
        }
        .commit-sha { font-family: 'Monaco', monospace; color: #0366d6; font-weight: 600; }
        .commit-message { margin: 5px 0; color: #1f2937; }
        .commit-date { font-size: 0.85em; color: #6c757d; }
        .more { text-align: center; margin-top: 20px; color: #6c757d; }
        @media (max-width: 768px) {
            .metrics-grid { grid-template-columns: 1fr; }
            .header h1 { font-size: 1.8em; }
        }
"#;

pub fn render(
    stats: &ActivityStatistics,
    summary: &ReportSummary,
    context: &ReportContext,
    config: &ReportConfig,
) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("    <meta charset=\"UTF-8\">\n");
    output.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    output.push_str(&format!(
        "    <title>Repository Activity Report - @{}</title>\n",
        escape_html(&context.username)
    ));
    output.push_str(&format!("    <style>{}    </style>\n", STYLE));
    output.push_str("</head>\n<body>\n    <div class=\"container\">\n");

    render_header(&mut output, context);
    render_partial_notice(&mut output, stats);
    render_cards(&mut output, &summary.headline_cards(), true);
    render_sizes(&mut output, summary);
    render_collaboration(&mut output, summary);
    render_pull_requests(&mut output, stats);
    render_issues_closed(&mut output, stats, &context.username);
    render_reviews(&mut output, stats);
    render_issues_opened(&mut output, stats);
    render_comments(&mut output, stats, config.comment_preview_chars);
    render_commits(&mut output, stats, config.html_commit_limit);

    output.push_str("    </div>\n</body>\n</html>\n");
    output
}

fn long_date(at: DateTime<Utc>) -> String {
    at.format("%B %d, %Y").to_string()
}

fn optional_long_date(at: Option<DateTime<Utc>>) -> String {
    at.map(long_date).unwrap_or_else(|| "Unknown".to_string())
}

fn open_section(output: &mut String, icon: &str, title: &str, note: Option<&str>) {
    output.push_str("        <div class=\"section\">\n");
    output.push_str(&format!(
        "            <h2 class=\"section-title\"><span>{}</span> {}</h2>\n",
        icon, title
    ));
    if let Some(note) = note {
        output.push_str(&format!(
            "            <p class=\"section-note\">{}</p>\n",
            note
        ));
    }
}

fn close_section(output: &mut String) {
    output.push_str("        </div>\n");
}

fn state_badge(state: ItemState) -> &'static str {
    match state {
        ItemState::Open => r#"<span class="badge badge-open">🔓 Open</span>"#,
        ItemState::Closed => r#"<span class="badge badge-closed">✅ Closed</span>"#,
    }
}

fn size_badge(class: SizeClass) -> String {
    format!(
        r#"<span class="badge badge-{} badge-size">{}</span>"#,
        class.as_str(),
        class.label()
    )
}

/// Card head shared by PR, issue, review and comment entries.
fn item_title(output: &mut String, number: u64, url: &str, title: &str, badges: &[&str]) {
    output.push_str("            <div class=\"pr-card\">\n");
    output.push_str("                <div class=\"pr-title\">\n");
    output.push_str(&format!(
        "                    <span class=\"pr-number\">#{}</span>\n",
        number
    ));
    output.push_str(&format!(
        "                    <a href=\"{}\" class=\"pr-link\" target=\"_blank\">{}</a>\n",
        escape_html(url),
        escape_html(title)
    ));
    for badge in badges {
        output.push_str(&format!("                    {}\n", badge));
    }
    output.push_str("                </div>\n");
}

fn item_stats(output: &mut String, stats: &[String]) {
    output.push_str("                <div class=\"pr-stats\">\n");
    for stat in stats {
        output.push_str(&format!(
            "                    <div class=\"pr-stat\">{}</div>\n",
            stat
        ));
    }
    output.push_str("                </div>\n");
}

fn render_header(output: &mut String, context: &ReportContext) {
    let window = &context.window;
    output.push_str("        <div class=\"header\">\n");
    output.push_str("            <h1>📊 Repository Activity Report</h1>\n");
    output.push_str(&format!(
        "            <div class=\"repo\">{}</div>\n",
        escape_html(&context.repo_slug())
    ));
    output.push_str(&format!(
        "            <div class=\"username\">@{}</div>\n",
        escape_html(&context.username)
    ));
    output.push_str(&format!(
        "            <div class=\"meta\">📅 Period: {} to {} ({} days) | 🕐 Generated: {}</div>\n",
        long_date(window.since),
        long_date(window.until),
        window.days,
        context.generated_at.format("%B %d, %Y at %H:%M:%S")
    ));
    output.push_str("        </div>\n");
}

fn render_partial_notice(output: &mut String, stats: &ActivityStatistics) {
    if stats.failed_categories.is_empty() {
        return;
    }
    let failed: Vec<String> = stats
        .failed_categories
        .iter()
        .map(ToString::to_string)
        .collect();
    output.push_str(&format!(
        "        <div class=\"notice\">⚠️ Partial report, could not fetch: {}</div>\n",
        failed.join(", ")
    ));
}

fn render_cards(output: &mut String, cards: &[MetricCard], highlight_first: bool) {
    output.push_str("        <div class=\"metrics-grid\">\n");
    for (i, card) in cards.iter().enumerate() {
        if highlight_first && i == 0 {
            output.push_str("            <div class=\"metric-card highlight\">\n");
        } else {
            output.push_str("            <div class=\"metric-card\">\n");
        }
        output.push_str(&format!(
            "                <div class=\"metric-label\">{}</div>\n",
            card.display_label()
        ));
        output.push_str(&format!(
            "                <div class=\"metric-value\">{}</div>\n",
            card.value
        ));
        if let Some(note) = &card.note {
            output.push_str(&format!(
                "                <div class=\"size-description\">{}</div>\n",
                note
            ));
        }
        output.push_str("            </div>\n");
    }
    output.push_str("        </div>\n");
}

fn render_sizes(output: &mut String, summary: &ReportSummary) {
    open_section(
        output,
        "📏",
        "Pull Request Size Distribution",
        Some("Based on total changes (additions + deletions)."),
    );
    output.push_str("            <div class=\"pr-size-chart\">\n");
    for class in SizeClass::ALL {
        output.push_str("                <div class=\"size-card\">\n");
        output.push_str(&format!(
            "                    <div class=\"size-label\">{}</div>\n",
            size_badge(class)
        ));
        output.push_str(&format!(
            "                    <div class=\"size-value\">{}</div>\n",
            summary.size_distribution.get(class)
        ));
        output.push_str(&format!(
            "                    <div class=\"size-description\">{}</div>\n",
            escape_html(class.description())
        ));
        output.push_str("                </div>\n");
    }
    output.push_str("            </div>\n");
    close_section(output);
}

fn render_collaboration(output: &mut String, summary: &ReportSummary) {
    open_section(output, "🤝", "Other repository collaboration", None);
    render_cards(output, &summary.collaboration_cards(), false);
    close_section(output);
}

fn render_pull_requests(output: &mut String, stats: &ActivityStatistics) {
    let prs = &stats.pull_requests_opened;
    if prs.is_empty() {
        return;
    }
    open_section(
        output,
        "🔀",
        &format!("Pull Requests Opened ({})", prs.len()),
        None,
    );
    for pr in prs {
        let status = match pr.outcome() {
            PrOutcome::Merged => r#"<span class="badge badge-merged">✅ Merged</span>"#,
            PrOutcome::Closed => r#"<span class="badge badge-closed">❌ Closed</span>"#,
            PrOutcome::Open => r#"<span class="badge badge-open">🔄 Open</span>"#,
        };
        let size = size_badge(pr.size_class);
        item_title(output, pr.number, &pr.url, &pr.title, &[status, size.as_str()]);
        item_stats(
            output,
            &[
                format!("📅 {}", long_date(pr.created_at)),
                format!("<span class=\"stat-additions\">+{}</span>", pr.additions),
                format!("<span class=\"stat-deletions\">-{}</span>", pr.deletions),
                format!("📊 {} total changes", pr.total_changes),
                format!("📄 {} files", pr.changed_files),
                format!("💾 {} commits", pr.commit_count),
            ],
        );
        output.push_str("            </div>\n");
    }
    close_section(output);
}

fn render_issues_closed(output: &mut String, stats: &ActivityStatistics, username: &str) {
    if stats.issues_closed.is_empty() {
        return;
    }
    open_section(
        output,
        "✅",
        &format!(
            "Issues Closed by {} ({})",
            escape_html(username),
            stats.issues_closed.len()
        ),
        None,
    );
    for closed in &stats.issues_closed {
        let issue = &closed.issue;
        item_title(
            output,
            issue.number,
            &issue.url,
            &issue.title,
            &[state_badge(ItemState::Closed)],
        );
        item_stats(
            output,
            &[
                format!("🔒 Closed: {}", long_date(closed.closed_by_user_at)),
                format!("💬 {} comments", issue.comment_count),
            ],
        );
        output.push_str("            </div>\n");
    }
    close_section(output);
}

fn review_badge_class(state: &str) -> &'static str {
    match state {
        "APPROVED" => "badge-approved",
        "CHANGES_REQUESTED" => "badge-changes-requested",
        _ => "badge-commented",
    }
}

fn render_reviews(output: &mut String, stats: &ActivityStatistics) {
    if stats.reviews.is_empty() {
        return;
    }
    open_section(
        output,
        "👀",
        &format!(
            "Pull Requests Reviewed ({} reviews on {} PRs)",
            stats.total_reviews_given, stats.unique_prs_reviewed
        ),
        Some("Showing all reviews. Some PRs may have been reviewed more than once."),
    );
    for review in &stats.reviews {
        let state = review.state.to_uppercase();
        let badge = format!(
            r#"<span class="badge {}">{}</span>"#,
            review_badge_class(&state),
            escape_html(&state)
        );
        item_title(
            output,
            review.pr_number,
            &review.pr_url,
            &review.pr_title,
            &[badge.as_str()],
        );
        item_stats(
            output,
            &[format!("📅 {}", optional_long_date(review.submitted_at))],
        );
        output.push_str("            </div>\n");
    }
    close_section(output);
}

fn render_issues_opened(output: &mut String, stats: &ActivityStatistics) {
    if stats.issues_opened.is_empty() {
        return;
    }
    open_section(
        output,
        "🐛",
        &format!("Issues Opened ({})", stats.issues_opened.len()),
        None,
    );
    for issue in &stats.issues_opened {
        item_title(
            output,
            issue.number,
            &issue.url,
            &issue.title,
            &[state_badge(issue.state)],
        );
        item_stats(
            output,
            &[
                format!("📅 {}", optional_long_date(issue.created_at)),
                format!("💬 {} comments", issue.comment_count),
            ],
        );
        output.push_str("            </div>\n");
    }
    close_section(output);
}

fn render_comments(output: &mut String, stats: &ActivityStatistics, preview_chars: usize) {
    if stats.issue_comments.is_empty() {
        return;
    }
    open_section(
        output,
        "💬",
        &format!(
            "Issue Comments ({} comments on {} issues)",
            stats.issue_comments.len(),
            stats.unique_issues_commented
        ),
        Some("Showing all comments. Some issues may have been commented on more than once."),
    );
    for comment in &stats.issue_comments {
        item_title(
            output,
            comment.issue_number,
            &comment.issue_url,
            &comment.issue_title,
            &[state_badge(comment.issue_state)],
        );
        item_stats(output, &[format!("📅 {}", long_date(comment.created_at))]);
        output.push_str(&format!(
            "                <div class=\"comment-preview\">{}</div>\n",
            escape_html(&preview_with_ellipsis(&comment.body_preview, preview_chars))
        ));
        output.push_str("            </div>\n");
    }
    close_section(output);
}

fn render_commits(output: &mut String, stats: &ActivityStatistics, limit: usize) {
    let commits = &stats.commits;
    if commits.is_empty() {
        return;
    }
    open_section(
        output,
        "💾",
        &format!("Direct Commits ({})", commits.len()),
        Some("Direct commits to the repository. Commits within PRs are counted in the PR cards above."),
    );
    output.push_str("            <div class=\"commit-list\">\n");
    for commit in commits.iter().take(limit) {
        let date = commit
            .authored_date
            .map(|at| at.format("%b %d, %Y %H:%M").to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        output.push_str("                <div class=\"commit-item\">\n");
        output.push_str(&format!(
            "                    <div><a href=\"{}\" class=\"commit-sha\" target=\"_blank\">{}</a> <span class=\"commit-message\">{}</span></div>\n",
            escape_html(&commit.url),
            escape_html(&commit.short_sha),
            escape_html(&commit.message)
        ));
        output.push_str(&format!(
            "                    <div class=\"commit-date\">{}</div>\n",
            date
        ));
        output.push_str("                </div>\n");
    }
    if commits.len() > limit {
        output.push_str(&format!(
            "                <p class=\"more\">... and {} more commits</p>\n",
            commits.len() - limit
        ));
    }
    output.push_str("            </div>\n");
    close_section(output);
}
