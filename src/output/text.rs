//! Plain-text rendering of timesheet trees and durations.

use crate::aggregator::{ReportSummary, TimesheetNode};
use crate::parser::schema::DateRange;

const KEY_WIDTH: usize = 36;
const SUMMARY_WIDTH: usize = 34;

/// Format seconds as `2h 30m`; zero and sub-minute values read `0m`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }

    if parts.is_empty() {
        "0m".to_string()
    } else {
        parts.join(" ")
    }
}

/// Format seconds as decimal hours with one fraction digit, `2.5h`
pub fn format_decimal_hours(seconds: u64) -> String {
    if seconds == 0 {
        return "0h".to_string();
    }
    // Tenths of an hour (360s each), rounded half up
    let tenths = seconds / 360 + u64::from(seconds % 360 >= 180);
    format!("{}.{}h", tenths / 10, tenths % 10)
}

/// Render the forest as an indented table with self and rollup time
///
/// **Public** - used by the report command's `--summary` output
pub fn render_tree(forest: &[TimesheetNode]) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "  {:<key$} {:<sum$} {:>10} {:>10}",
        "Issue",
        "Summary",
        "Self",
        "Rollup",
        key = KEY_WIDTH,
        sum = SUMMARY_WIDTH
    ));
    lines.push(format!("  {}", "-".repeat(KEY_WIDTH + SUMMARY_WIDTH + 23)));

    for root in forest {
        render_node(root, 0, &mut lines);
    }

    lines.join("\n")
}

fn render_node(node: &TimesheetNode, depth: usize, lines: &mut Vec<String>) {
    let label = truncate(
        &format!("{}{} [{}]", "  ".repeat(depth), node.issue_key, node.issue_type),
        KEY_WIDTH,
    );

    lines.push(format!(
        "  {:<key$} {:<sum$} {:>10} {:>10}",
        label,
        truncate(&node.summary, SUMMARY_WIDTH),
        format_duration(node.self_total_seconds),
        format_duration(node.rollup_total_seconds),
        key = KEY_WIDTH,
        sum = SUMMARY_WIDTH
    ));

    for child in &node.children {
        render_node(child, depth + 1, lines);
    }
}

/// Render contributor and daily totals
///
/// With a range, every day in it is listed, idle days included.
pub fn render_summary(summary: &ReportSummary, range: Option<&DateRange>) -> String {
    let mut lines = Vec::new();

    lines.push("  CONTRIBUTORS".to_string());
    for user in &summary.users {
        let seconds = summary
            .seconds_by_author
            .get(&user.account_id)
            .copied()
            .unwrap_or(0);
        lines.push(format!(
            "    {:<30} {:>10}",
            truncate(&user.display_name, 30),
            format_duration(seconds)
        ));
    }

    lines.push(String::new());
    lines.push("  DAILY TOTALS".to_string());
    let days = match range {
        Some(range) => range.days(),
        None => summary.daily_totals.keys().copied().collect(),
    };
    for day in days {
        let seconds = summary.daily_totals.get(&day).copied().unwrap_or(0);
        lines.push(format!("    {} {:>10}", day, format_duration(seconds)));
    }

    if let Some((day, seconds)) = summary.busiest_day() {
        lines.push(format!("    Busiest: {} ({})", day, format_duration(seconds)));
    }

    lines.push(String::new());
    lines.push(format!(
        "  TOTAL: {} ({})",
        format_duration(summary.grand_total),
        format_decimal_hours(summary.grand_total)
    ));

    lines.join("\n")
}

/// Shorten to `width` characters, marking the cut with `...`
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
