use pretty_assertions::assert_eq;
use worklog_rollup::hierarchy::{build_forest, flatten};
use worklog_rollup::parser::{IssueType, WorkItem};
use worklog_rollup::utils::config::MAX_HIERARCHY_DEPTH;
use worklog_rollup::utils::HierarchyError;

fn item(key: &str, issue_type: IssueType, parent: Option<&str>) -> WorkItem {
    WorkItem {
        id: key.to_string(),
        key: key.to_string(),
        summary: String::new(),
        issue_type,
        parent_key: parent.map(str::to_string),
    }
}

#[test]
fn test_every_item_appears_once() {
    let items = vec![
        item("A-1", IssueType::Epic, None),
        item("A-2", IssueType::Story, Some("A-1")),
        item("A-3", IssueType::Task, Some("A-2")),
        item("A-4", IssueType::Task, Some("A-2")),
        item("A-5", IssueType::Bug, None),
    ];
    let forest = build_forest(&items).unwrap();

    let mut keys: Vec<&str> = flatten(&forest).iter().map(|n| n.issue_key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["A-1", "A-2", "A-3", "A-4", "A-5"]);
}

#[test]
fn test_child_listed_before_parent() {
    let items = vec![
        item("A-3", IssueType::Subtask, Some("A-2")),
        item("A-2", IssueType::Story, Some("A-1")),
        item("A-1", IssueType::Epic, None),
    ];
    let forest = build_forest(&items).unwrap();

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].children[0].children[0].issue_key, "A-3");
}

#[test]
fn test_flatten_is_pre_order() {
    let items = vec![
        item("A-1", IssueType::Epic, None),
        item("A-2", IssueType::Story, Some("A-1")),
        item("A-3", IssueType::Task, Some("A-2")),
        item("A-4", IssueType::Story, Some("A-1")),
        item("A-5", IssueType::Task, None),
    ];
    let forest = build_forest(&items).unwrap();

    let keys: Vec<&str> = flatten(&forest).iter().map(|n| n.issue_key.as_str()).collect();
    assert_eq!(keys, vec!["A-1", "A-2", "A-3", "A-4", "A-5"]);
}

#[test]
fn test_unknown_types_sort_with_tasks() {
    let items = vec![
        item("A-3", IssueType::Subtask, None),
        item("A-2", IssueType::Other("Spike".to_string()), None),
        item("A-1", IssueType::Task, None),
        item("A-9", IssueType::Story, None),
    ];
    let forest = build_forest(&items).unwrap();

    let keys: Vec<&str> = forest.iter().map(|n| n.issue_key.as_str()).collect();
    assert_eq!(keys, vec!["A-9", "A-1", "A-2", "A-3"]);
}

#[test]
fn test_duplicate_keys_keep_first() {
    let mut second = item("A-1", IssueType::Bug, None);
    second.summary = "second".to_string();
    let mut first = item("A-1", IssueType::Task, None);
    first.summary = "first".to_string();

    let forest = build_forest(&[first, second]).unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].summary, "first");
}

#[test]
fn test_cycle_fails_fast() {
    let items = vec![
        item("A-1", IssueType::Epic, None),
        item("A-2", IssueType::Story, Some("A-3")),
        item("A-3", IssueType::Story, Some("A-2")),
    ];

    assert_eq!(
        build_forest(&items),
        Err(HierarchyError::Cycle(vec!["A-2".to_string(), "A-3".to_string()]))
    );
}

#[test]
fn test_descendants_of_cycle_are_reported() {
    let items = vec![
        item("A-1", IssueType::Story, Some("A-1")),
        item("A-2", IssueType::Task, Some("A-1")),
    ];

    match build_forest(&items) {
        Err(HierarchyError::Cycle(keys)) => assert_eq!(keys, vec!["A-1", "A-2"]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_depth_limit() {
    let mut items = vec![item("D-0", IssueType::Epic, None)];
    for i in 1..=MAX_HIERARCHY_DEPTH {
        items.push(item(
            &format!("D-{}", i),
            IssueType::Task,
            Some(&format!("D-{}", i - 1)),
        ));
    }

    assert!(matches!(
        build_forest(&items),
        Err(HierarchyError::DepthExceeded { ref root, limit }) if root == "D-0" && limit == MAX_HIERARCHY_DEPTH
    ));

    items.pop();
    assert!(build_forest(&items).is_ok());
}

#[test]
fn test_empty_input() {
    assert!(build_forest(&[]).unwrap().is_empty());
}
