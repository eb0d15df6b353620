//! Work-item hierarchy: forest construction, ordering and traversal.
//!
//! Converts a flat, partially linked issue list into owned trees
//! (epic -> story -> task -> sub-task) with a deterministic sibling order.

pub mod builder;
pub mod node;

// Re-export main types and functions
pub use builder::{build_forest, flatten, sort_forest};
pub use node::{HierarchyNode, TreeNode};
