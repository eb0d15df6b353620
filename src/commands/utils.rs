use crate::aggregator::check_rollups;
use crate::output::{format_duration, read_report};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
///
/// Parses the report, checks the schema version and re-verifies that every
/// node's rollup equals its own time plus its children's.
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    let violations = check_rollups(&report.nodes);
    if !violations.is_empty() {
        for violation in &violations {
            println!("  ✗ {}", violation);
        }
        anyhow::bail!("{} rollup inconsistencies found", violations.len());
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    if let (Some(start), Some(end)) = (report.start_date, report.end_date) {
        println!("  Period: {} ~ {}", start, end);
    }
    println!("  Root Items: {}", report.summary.root_count);
    println!("  Items: {}", report.summary.node_count);
    println!("  Contributors: {}", report.summary.users.len());
    println!("  Total Time: {}", format_duration(report.summary.grand_total));

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Worklog Rollup Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  generatedAt: string          - ISO 8601 timestamp");
        println!("  startDate/endDate: string?   - Inclusive reporting period");
        println!("  selectedAuthors: array       - Account ids kept (empty = all)");
        println!("  nodes: array                 - Timesheet forest, pruned to items with time");
        println!("    issueKey: string           - Work item key");
        println!("    issueType: string          - Epic, Story, Task, Bug, Sub-task, ...");
        println!("    projectKey: string         - Key prefix before the first '-'");
        println!("    selfSecondsByDay: object   - Day -> seconds logged on this item");
        println!("    rollupSecondsByDay: object - Day -> seconds including descendants");
        println!("    authors: array             - Per-contributor seconds by day");
        println!("    children: array            - Nested nodes");
        println!("  hierarchy: array?            - Simple rollup of every item (--simple)");
        println!("  timesheet: object?           - Flat per-item rows (--flat)");
        println!("  summary: object              - Users, daily totals, grand total");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Worklog Rollup v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Hierarchical time reporting: epic/story/task rollups of worklogs.");
}
