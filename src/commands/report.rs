//! Report command implementation.
//!
//! The report command:
//! 1. Reads the work-item and worklog exports
//! 2. Narrows worklogs to the date range
//! 3. Builds one hierarchy per project that has worklogs
//! 4. Computes daily rollups (and optionally the simple rollup)
//! 5. Applies the contributor filter (tree and optional sections alike)
//! 6. Writes the JSON report

use super::models::ReportArgs;
use crate::aggregator::{
    aggregate, aggregate_daily, filter_by_authors, flat_timesheet, users_from_entries,
    TimesheetNode,
};
use crate::hierarchy::{build_forest, HierarchyNode};
use crate::output::{render_summary, render_tree, to_report, write_report};
use crate::parser::schema::{project_key, TimeEntry, WorkItem};
use crate::parser::{
    filter_entries_by_authors, filter_entries_by_range, read_time_entries, read_work_items,
};
use crate::utils::error::HierarchyError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::time::Instant;

/// Work items and entries belonging to one project
#[derive(Debug, Default)]
pub struct ProjectScope<'a> {
    pub items: Vec<WorkItem>,
    pub entries: Vec<&'a TimeEntry>,
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed input files
/// * Parent cycles or runaway nesting in the work items
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/5: Reading inputs...");
    let items = read_work_items(&args.issues_path)
        .with_context(|| format!("Failed to read work items from {}", args.issues_path.display()))?;
    let mut entries = read_time_entries(&args.worklogs_path)
        .with_context(|| format!("Failed to read worklogs from {}", args.worklogs_path.display()))?;

    info!("Step 2/5: Applying date range...");
    let range = args.date_range()?;
    if let Some(range) = &range {
        entries = filter_entries_by_range(entries, range);
    }
    info!("{} work items, {} worklogs in range", items.len(), entries.len());

    let contributors = users_from_entries(&entries);
    let selected = args.selected_authors();

    info!("Step 3/5: Building hierarchies...");
    let nodes = {
        let scopes = scope_by_project(&items, &entries);
        debug!("Projects with worklogs: {:?}", scopes.keys().collect::<Vec<_>>());
        daily_by_project(&scopes).context("Failed to build work-item hierarchy")?
    };

    info!("Step 4/5: Aggregating...");
    let nodes = filter_by_authors(nodes, &selected);

    // The optional sections are built from the selected contributors' entries only
    let entries = filter_entries_by_authors(entries, &selected);
    let hierarchy = if args.include_hierarchy {
        let scopes = scope_by_project(&items, &entries);
        Some(simple_by_project(&scopes).context("Failed to build work-item hierarchy")?)
    } else {
        None
    };

    info!("Step 5/5: Writing report...");
    let mut report = to_report(nodes, range, &selected);
    report.contributors = contributors;
    report.hierarchy = hierarchy;
    if args.include_flat {
        report.timesheet = Some(flat_timesheet(&items, &entries));
    }
    info!("Report summary: {}", report.summary.summary());

    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(88));
        println!("TIMESHEET SUMMARY");
        println!("{}", "=".repeat(88));
        if let (Some(start), Some(end)) = (report.start_date, report.end_date) {
            println!("Period: {} ~ {}", start, end);
        }
        println!("{}", render_tree(&report.nodes));
        println!();
        println!("{}", render_summary(&report.summary, range.as_ref()));
        println!("{}", "=".repeat(88));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Split inputs by project, keeping only projects that have entries
///
/// **Public** - the engine runs once per returned scope
pub fn scope_by_project<'a>(
    items: &[WorkItem],
    entries: &'a [TimeEntry],
) -> BTreeMap<String, ProjectScope<'a>> {
    let mut scopes: BTreeMap<String, ProjectScope<'a>> = BTreeMap::new();

    for entry in entries {
        scopes
            .entry(project_key(&entry.issue_key).to_string())
            .or_default()
            .entries
            .push(entry);
    }

    for item in items {
        if let Some(scope) = scopes.get_mut(item.project_key()) {
            scope.items.push(item.clone());
        }
    }

    scopes
}

/// Daily rollup per project, forests concatenated in project-key order
pub fn daily_by_project(
    scopes: &BTreeMap<String, ProjectScope<'_>>,
) -> Result<Vec<TimesheetNode>, HierarchyError> {
    let mut nodes = Vec::new();

    for (project, scope) in scopes {
        let forest = build_forest(&scope.items)?;
        let entries = owned_entries(scope);
        let project_nodes = aggregate_daily(&forest, &entries);
        debug!("Project {}: {} roots with time", project, project_nodes.len());
        nodes.extend(project_nodes);
    }

    Ok(nodes)
}

/// Simple rollup per project, every node kept
pub fn simple_by_project(
    scopes: &BTreeMap<String, ProjectScope<'_>>,
) -> Result<Vec<HierarchyNode>, HierarchyError> {
    let mut forest = Vec::new();

    for scope in scopes.values() {
        let entries = owned_entries(scope);
        forest.extend(aggregate(build_forest(&scope.items)?, &entries));
    }

    Ok(forest)
}

fn owned_entries(scope: &ProjectScope<'_>) -> Vec<TimeEntry> {
    scope.entries.iter().map(|&entry| entry.clone()).collect()
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if !args.issues_path.is_file() {
        anyhow::bail!("Work item file not found: {}", args.issues_path.display());
    }

    if !args.worklogs_path.is_file() {
        anyhow::bail!("Worklog file not found: {}", args.worklogs_path.display());
    }

    if args.start.is_some() != args.end.is_some() {
        anyhow::bail!("--start and --end must be given together");
    }

    args.date_range()?;

    if args.authors.iter().any(|author| author.trim().is_empty()) {
        anyhow::bail!("Author account ids cannot be empty");
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Author, IssueType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn input_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[]").unwrap();
        file
    }

    fn entry(key: &str) -> TimeEntry {
        TimeEntry {
            id: key.to_string(),
            issue_key: key.to_string(),
            author: Author {
                account_id: "alice".to_string(),
                display_name: "Alice".to_string(),
                avatar_url: None,
            },
            logged_seconds: 60,
            started_at: "2024-01-01T09:00:00".parse().unwrap(),
            comment: None,
        }
    }

    fn item(key: &str) -> WorkItem {
        WorkItem {
            id: key.to_string(),
            key: key.to_string(),
            summary: String::new(),
            issue_type: IssueType::Task,
            parent_key: None,
        }
    }

    #[test]
    fn test_validate_args_valid() {
        let issues = input_file();
        let worklogs = input_file();
        let args = ReportArgs {
            issues_path: issues.path().to_path_buf(),
            worklogs_path: worklogs.path().to_path_buf(),
            start: "2024-01-01".parse().ok(),
            end: "2024-01-31".parse().ok(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_missing_file() {
        let worklogs = input_file();
        let args = ReportArgs {
            issues_path: "/nonexistent/issues.json".into(),
            worklogs_path: worklogs.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_half_range() {
        let issues = input_file();
        let worklogs = input_file();
        let args = ReportArgs {
            issues_path: issues.path().to_path_buf(),
            worklogs_path: worklogs.path().to_path_buf(),
            start: "2024-01-01".parse().ok(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_reversed_range() {
        let issues = input_file();
        let worklogs = input_file();
        let args = ReportArgs {
            issues_path: issues.path().to_path_buf(),
            worklogs_path: worklogs.path().to_path_buf(),
            start: "2024-02-01".parse().ok(),
            end: "2024-01-01".parse().ok(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_blank_author() {
        let issues = input_file();
        let worklogs = input_file();
        let args = ReportArgs {
            issues_path: issues.path().to_path_buf(),
            worklogs_path: worklogs.path().to_path_buf(),
            authors: vec!["  ".to_string()],
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_scope_by_project_skips_idle_projects() {
        let items = vec![item("A-1"), item("B-1"), item("C-1")];
        let entries = vec![entry("A-1"), entry("C-7")];

        let scopes = scope_by_project(&items, &entries);
        assert_eq!(scopes.keys().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(scopes["A"].items.len(), 1);
        assert_eq!(scopes["C"].entries.len(), 1);
    }

    #[test]
    fn test_daily_by_project_concatenates() {
        let items = vec![item("B-1"), item("A-1")];
        let entries = vec![entry("B-1"), entry("A-1")];

        let nodes = daily_by_project(&scope_by_project(&items, &entries)).unwrap();
        let keys: Vec<&str> = nodes.iter().map(|n| n.issue_key.as_str()).collect();
        assert_eq!(keys, vec!["A-1", "B-1"]);
    }
}
