//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use models::ReportArgs;
pub use report::{
    daily_by_project, execute_report, scope_by_project, simple_by_project, validate_args,
    ProjectScope,
};
pub use utils::{display_schema, display_version, validate_report_file};
