//! Build a forest of hierarchy nodes from a flat work-item list.
//!
//! Construction goes through an arena: every item gets a slot, links are
//! recorded as slot indices, and the owned tree is assembled from the roots
//! once the links are known to be acyclic. The key index is dropped after
//! linking, so no node keeps a reference to its parent.

use super::node::{HierarchyNode, TreeNode};
use crate::parser::schema::WorkItem;
use crate::utils::config::MAX_HIERARCHY_DEPTH;
use crate::utils::error::HierarchyError;
use log::{debug, warn};
use std::collections::HashMap;

/// Build the hierarchy forest for a set of work items
///
/// **Public** - main entry point for tree building
///
/// # Arguments
/// * `items` - Work items in any order
///
/// # Returns
/// Root nodes with children nested, siblings sorted at every level
///
/// # Algorithm
/// 1. Give every unique key a slot (first occurrence wins)
/// 2. Link each slot to its parent's slot when the parent is present;
///    otherwise it is a root, keeping its `parent_key` label
/// 3. Reject anything unreachable from a root (parent cycles)
/// 4. Assemble owned nodes from the roots and sort siblings
///
/// # Errors
/// * `HierarchyError::Cycle` - items whose parent chain loops
/// * `HierarchyError::DepthExceeded` - nesting deeper than `MAX_HIERARCHY_DEPTH`
pub fn build_forest(items: &[WorkItem]) -> Result<Vec<HierarchyNode>, HierarchyError> {
    debug!("Building hierarchy from {} work items", items.len());

    let mut slots: Vec<&WorkItem> = Vec::with_capacity(items.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(items.len());

    for item in items {
        if index.contains_key(item.key.as_str()) {
            warn!("Duplicate work item key {}, keeping first occurrence", item.key);
            continue;
        }
        index.insert(item.key.as_str(), slots.len());
        slots.push(item);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    let mut roots: Vec<usize> = Vec::new();
    let mut dangling = 0usize;

    for (slot, item) in slots.iter().enumerate() {
        let parent_slot = item
            .parent_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .and_then(|key| index.get(key).copied());

        match parent_slot {
            Some(parent) => children[parent].push(slot),
            None => {
                if item.parent_key.is_some() {
                    dangling += 1;
                }
                roots.push(slot);
            }
        }
    }
    drop(index);

    if dangling > 0 {
        debug!("{} work items reference a parent outside the input", dangling);
    }

    check_reachable(&slots, &children, &roots)?;

    let mut forest = roots
        .iter()
        .map(|&root| assemble(root, &slots, &children, 1, &slots[root].key))
        .collect::<Result<Vec<_>, _>>()?;

    sort_forest(&mut forest);

    debug!("Built forest with {} roots", forest.len());
    Ok(forest)
}

/// Sort siblings by type priority, then key, at every level
///
/// **Public** - exposed so callers that edit a forest can restore the order
pub fn sort_forest(nodes: &mut [HierarchyNode]) {
    nodes.sort_by(|a, b| {
        a.issue_type
            .priority()
            .cmp(&b.issue_type.priority())
            .then_with(|| a.issue_key.cmp(&b.issue_key))
    });

    for node in nodes.iter_mut() {
        sort_forest(&mut node.children);
    }
}

/// Depth-first, pre-order list of every node in the forest
///
/// **Public** - linear iteration for consumers; parents precede descendants
/// and sibling order is preserved
pub fn flatten<T: TreeNode>(forest: &[T]) -> Vec<&T> {
    let mut result = Vec::new();
    let mut stack: Vec<&T> = forest.iter().rev().collect();

    while let Some(node) = stack.pop() {
        result.push(node);
        stack.extend(node.children().iter().rev());
    }

    result
}

/// Every slot must be reachable from a root; the rest sit on parent cycles
///
/// **Private** - iterative so a malformed input cannot blow the stack
fn check_reachable(
    slots: &[&WorkItem],
    children: &[Vec<usize>],
    roots: &[usize],
) -> Result<(), HierarchyError> {
    let mut visited = vec![false; slots.len()];
    let mut stack: Vec<usize> = roots.to_vec();

    while let Some(slot) = stack.pop() {
        if visited[slot] {
            continue;
        }
        visited[slot] = true;
        stack.extend(children[slot].iter().copied());
    }

    let mut cyclic: Vec<String> = visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(slot, _)| slots[slot].key.clone())
        .collect();

    if cyclic.is_empty() {
        Ok(())
    } else {
        cyclic.sort();
        warn!("Parent cycle among {} work items", cyclic.len());
        Err(HierarchyError::Cycle(cyclic))
    }
}

/// Turn a slot and its descendants into owned nodes
///
/// **Private** - recursion is bounded by the depth guard
fn assemble(
    slot: usize,
    slots: &[&WorkItem],
    children: &[Vec<usize>],
    depth: usize,
    root_key: &str,
) -> Result<HierarchyNode, HierarchyError> {
    if depth > MAX_HIERARCHY_DEPTH {
        return Err(HierarchyError::DepthExceeded {
            root: root_key.to_string(),
            limit: MAX_HIERARCHY_DEPTH,
        });
    }

    let mut node = HierarchyNode::from_item(slots[slot]);
    node.children = children[slot]
        .iter()
        .map(|&child| assemble(child, slots, children, depth + 1, root_key))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(node)
}
