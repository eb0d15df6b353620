//! Worklog Rollup CLI
//!
//! Builds epic/story/task hierarchies from a work-item export and rolls
//! worklog time up the tree, by day and by contributor.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use worklog_rollup::commands::{
    display_schema, display_version, execute_report, validate_args, validate_report_file,
    ReportArgs,
};
use worklog_rollup::parser::parse_date;
use worklog_rollup::utils::config::DEFAULT_REPORT_PATH;

/// Worklog Rollup - hierarchical timesheets from worklogs
#[derive(Parser, Debug)]
#[command(name = "worklog-rollup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a hierarchical timesheet report
    Report {
        /// Work-item export (JSON)
        #[arg(short, long, env = "WORKLOG_ROLLUP_ISSUES")]
        issues: PathBuf,

        /// Worklog export (JSON)
        #[arg(short, long, env = "WORKLOG_ROLLUP_WORKLOGS")]
        worklogs: PathBuf,

        /// First day to include (YYYY-MM-DD)
        #[arg(long, requires = "end", value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long, requires = "start", value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Keep only these contributors (account id, repeatable)
        #[arg(short, long = "author")]
        authors: Vec<String>,

        /// Output path for JSON report
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// Embed the simple rollup of every work item
        #[arg(long)]
        simple: bool,

        /// Embed the flat per-item timesheet
        #[arg(long)]
        flat: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            issues,
            worklogs,
            start,
            end,
            authors,
            output,
            simple,
            flat,
            summary,
        } => {
            let args = ReportArgs {
                issues_path: issues,
                worklogs_path: worklogs,
                start,
                end,
                authors,
                output_json: output,
                include_hierarchy: simple,
                include_flat: flat,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
