//! Hierarchy node shape shared by the builder and the simple rollup.

use crate::parser::schema::{IssueType, TimeEntry, WorkItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Any node that owns an ordered list of children of its own type
///
/// **Public** - lets traversal helpers work on both rollup shapes
pub trait TreeNode: Sized {
    fn children(&self) -> &[Self];
}

/// A work item placed in the forest, with self and rollup time
///
/// Owned exclusively by its parent (or the root list). `parent_key` is a
/// label only and may name an item outside the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub issue_id: String,
    pub issue_key: String,
    pub summary: String,
    pub issue_type: IssueType,
    pub parent_key: Option<String>,
    pub children: Vec<HierarchyNode>,

    /// Entries logged directly on this item
    #[serde(skip)]
    pub entries: Vec<TimeEntry>,

    pub self_seconds: u64,
    pub self_seconds_by_author: BTreeMap<String, u64>,
    pub rollup_seconds: u64,
    pub rollup_seconds_by_author: BTreeMap<String, u64>,
}

impl HierarchyNode {
    /// Create an empty, childless node for a work item
    pub fn from_item(item: &WorkItem) -> Self {
        Self {
            issue_id: item.id.clone(),
            issue_key: item.key.clone(),
            summary: item.summary.clone(),
            issue_type: item.issue_type.clone(),
            parent_key: item.parent_key.clone(),
            children: Vec::new(),
            entries: Vec::new(),
            self_seconds: 0,
            self_seconds_by_author: BTreeMap::new(),
            rollup_seconds: 0,
            rollup_seconds_by_author: BTreeMap::new(),
        }
    }
}

impl TreeNode for HierarchyNode {
    fn children(&self) -> &[Self] {
        &self.children
    }
}
