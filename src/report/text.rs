//! Plain text report.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{ActivityStatistics, ItemState, PrOutcome, ReportConfig, SizeClass};
use crate::report::{ReportContext, ReportSummary};
use crate::utils::preview_with_ellipsis;

const RULE_WIDTH: usize = 80;

pub fn render(
    stats: &ActivityStatistics,
    summary: &ReportSummary,
    context: &ReportContext,
    config: &ReportConfig,
) -> String {
    let mut output = String::new();

    render_header(&mut output, context);
    render_partial_notice(&mut output, stats);
    render_summary(&mut output, summary);
    render_sizes(&mut output, summary);
    render_pull_requests(&mut output, stats);
    render_reviews(&mut output, stats);
    render_issues_opened(&mut output, stats);
    render_issues_closed(&mut output, stats);
    render_comments(&mut output, stats, config.comment_preview_chars);
    render_commits(&mut output, stats, config.text_commit_limit);

    output
}

fn heavy_rule(output: &mut String) {
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push('\n');
}

fn heading(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
}

fn line(output: &mut String, label: &str, value: impl std::fmt::Display) {
    output.push_str(&format!("{:<26}{}\n", format!("{label}:"), value));
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn optional_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(timestamp).unwrap_or_else(|| "Unknown".to_string())
}

fn render_header(output: &mut String, context: &ReportContext) {
    let window = &context.window;
    heavy_rule(output);
    output.push_str("Repository Activity Report\n");
    output.push_str(&format!("Repository: {}\n", context.repo_slug()));
    output.push_str(&format!("User: @{}\n", context.username));
    output.push_str(&format!(
        "Period: {} to {} ({} days)\n",
        window.since_date(),
        window.until_date(),
        window.days
    ));
    output.push_str(&format!(
        "Generated: {}\n",
        context.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    heavy_rule(output);
    output.push('\n');
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
        "⚠️  Partial report, could not fetch: {}\n\n",
        failed.join(", ")
    ));
}

fn render_summary(output: &mut String, summary: &ReportSummary) {
    heading(output, "📊 SUMMARY STATISTICS");
    line(output, "Pull Requests Merged", summary.prs_merged);
    line(output, "Reviews Given", summary.reviews_given);
    line(output, "Unique PRs Reviewed", summary.unique_prs_reviewed);
    line(output, "Issues Opened", summary.issues_opened);
    line(output, "Issues Closed", summary.issues_closed);
    line(output, "Issue Comments", summary.issue_comments);
    line(output, "Unique Issues Commented", summary.unique_issues_commented);
    line(output, "Commits in PRs", summary.commits_in_prs);
    line(output, "Direct Commits", summary.direct_commits);
    line(output, "Total Lines Added", format!("+{}", summary.lines_added));
    line(output, "Total Lines Deleted", format!("-{}", summary.lines_deleted));
    line(output, "Total Files Changed", summary.files_changed);
    output.push('\n');
}

fn render_sizes(output: &mut String, summary: &ReportSummary) {
    heading(output, "📏 PULL REQUEST SIZE DISTRIBUTION");
    for class in SizeClass::ALL {
        let label = format!("{:<3} ({})", class.label(), class.description());
        line(output, &label, summary.size_distribution.get(class));
    }
    output.push('\n');
}

fn render_pull_requests(output: &mut String, stats: &ActivityStatistics) {
    let prs = &stats.pull_requests_opened;
    if prs.is_empty() {
        return;
    }
    heading(output, &format!("🔀 PULL REQUESTS OPENED ({})", prs.len()));
    for pr in prs {
        let status = match pr.outcome() {
            PrOutcome::Merged => "✅ Merged",
            PrOutcome::Closed => "❌ Closed",
            PrOutcome::Open => "🔄 Open",
        };
        output.push_str(&format!(
            "  {} [{}] #{}: {}\n",
            status, pr.size_class, pr.number, pr.title
        ));
        output.push_str(&format!("    URL: {}\n", pr.url));
        output.push_str(&format!(
            "    Stats: +{} -{} lines ({} total changes), {} files, {} commits\n",
            pr.additions, pr.deletions, pr.total_changes, pr.changed_files, pr.commit_count
        ));
        output.push_str(&format!("    Created: {}\n", timestamp(pr.created_at)));
        if let Some(merged_at) = pr.merged_at {
            output.push_str(&format!("    Merged: {}\n", timestamp(merged_at)));
        }
        output.push('\n');
    }
}

fn render_reviews(output: &mut String, stats: &ActivityStatistics) {
    if stats.reviews.is_empty() {
        return;
    }
    heading(
        output,
        &format!(
            "👀 PULL REQUESTS REVIEWED ({} reviews on {} PRs)",
            stats.total_reviews_given, stats.unique_prs_reviewed
        ),
    );
    for review in &stats.reviews {
        output.push_str(&format!(
            "  • {} on #{}: {}\n",
            review.state.to_uppercase(),
            review.pr_number,
            review.pr_title
        ));
        output.push_str(&format!("    URL: {}\n", review.pr_url));
        output.push_str(&format!(
            "    Submitted: {}\n",
            optional_timestamp(review.submitted_at)
        ));
        output.push('\n');
    }
}

fn render_issues_opened(output: &mut String, stats: &ActivityStatistics) {
    if stats.issues_opened.is_empty() {
        return;
    }
    heading(
        output,
        &format!("🐛 ISSUES OPENED ({})", stats.issues_opened.len()),
    );
    for issue in &stats.issues_opened {
        let status = match issue.state {
            ItemState::Open => "🔓 Open",
            ItemState::Closed => "✅ Closed",
        };
        output.push_str(&format!("  {} #{}: {}\n", status, issue.number, issue.title));
        output.push_str(&format!("    URL: {}\n", issue.url));
        output.push_str(&format!(
            "    Created: {}\n",
            optional_timestamp(issue.created_at)
        ));
        output.push_str(&format!("    Comments: {}\n", issue.comment_count));
        if let Some(closed_at) = issue.closed_at {
            output.push_str(&format!("    Closed: {}\n", timestamp(closed_at)));
        }
        output.push('\n');
    }
}

fn render_issues_closed(output: &mut String, stats: &ActivityStatistics) {
    if stats.issues_closed.is_empty() {
        return;
    }
    heading(
        output,
        &format!("✅ ISSUES CLOSED BY USER ({})", stats.issues_closed.len()),
    );
    for closed in &stats.issues_closed {
        let issue = &closed.issue;
        output.push_str(&format!("  ✅ #{}: {}\n", issue.number, issue.title));
        output.push_str(&format!("    URL: {}\n", issue.url));
        output.push_str(&format!(
            "    Closed: {}\n",
            timestamp(closed.closed_by_user_at)
        ));
        output.push_str(&format!("    Comments: {}\n", issue.comment_count));
        output.push('\n');
    }
}

fn render_comments(output: &mut String, stats: &ActivityStatistics, preview_chars: usize) {
    if stats.issue_comments.is_empty() {
        return;
    }
    heading(
        output,
        &format!(
            "💬 ISSUE COMMENTS ({} comments on {} issues)",
            stats.issue_comments.len(),
            stats.unique_issues_commented
        ),
    );
    for comment in &stats.issue_comments {
        let status = match comment.issue_state {
            ItemState::Open => "🔓 Open",
            ItemState::Closed => "✅ Closed",
        };
        output.push_str(&format!(
            "  • {} #{}: {}\n",
            status, comment.issue_number, comment.issue_title
        ));
        output.push_str(&format!("    URL: {}\n", comment.issue_url));
        output.push_str(&format!("    Commented: {}\n", timestamp(comment.created_at)));
        output.push_str(&format!(
            "    Preview: {}\n",
            preview_with_ellipsis(&comment.body_preview, preview_chars)
        ));
        output.push('\n');
    }
}

fn render_commits(output: &mut String, stats: &ActivityStatistics, limit: usize) {
    let commits = &stats.commits;
    if commits.is_empty() {
        return;
    }
    heading(output, &format!("💾 DIRECT COMMITS ({})", commits.len()));
    output.push_str("Note: These are direct commits. Commits in PRs are shown above.\n\n");
    for commit in commits.iter().take(limit) {
        output.push_str(&format!("  • {}: {}\n", commit.short_sha, commit.message));
        output.push_str(&format!("    {}\n", optional_timestamp(commit.authored_date)));
    }
    if commits.len() > limit {
        output.push_str(&format!("  ... and {} more\n", commits.len() - limit));
    }
    output.push('\n');
}
