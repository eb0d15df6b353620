use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use worklog_rollup::parser::{
    filter_entries_by_range, parse_time_entries, parse_timestamp, parse_work_items,
    read_time_entries, read_work_items, DateRange, IssueType,
};
use worklog_rollup::utils::ParseError;

fn write_json(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

#[test]
fn test_read_wrapped_work_items() {
    let file = write_json(&json!({
        "issues": [
            { "id": 10001, "key": "WEB-1", "fields": {
                "summary": "Checkout", "issuetype": { "name": "Epic" } } },
            { "id": "10002", "key": "WEB-2", "fields": {
                "summary": "Cart", "issuetype": { "name": "Story" },
                "parent": { "key": "WEB-1" } } },
            { "id": "10003", "key": "WEB-3", "type": "Sub-task", "parentKey": "WEB-2" }
        ]
    }));

    let items = read_work_items(file.path()).unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "10001");
    assert_eq!(items[0].issue_type, IssueType::Epic);
    assert_eq!(items[1].parent_key.as_deref(), Some("WEB-1"));
    assert_eq!(items[2].issue_type, IssueType::Subtask);
    assert_eq!(items[2].summary, "");
}

#[test]
fn test_read_worklogs_with_rich_comment() {
    let file = write_json(&json!([
        {
            "id": 7,
            "issueKey": "WEB-2",
            "author": {
                "accountId": "acc-1",
                "displayName": "Alice",
                "avatarUrls": { "16x16": "small.png", "24x24": "medium.png" }
            },
            "timeSpentSeconds": 5400,
            "started": "2024-01-15T09:30:00.000+0100",
            "comment": {
                "type": "doc",
                "content": [
                    { "type": "paragraph", "content": [
                        { "type": "text", "text": "Pairing " },
                        { "type": "text", "text": "session" }
                    ] },
                    { "type": "paragraph", "content": [
                        { "type": "text", "text": "Follow-up" }
                    ] }
                ]
            }
        }
    ]));

    let entries = read_time_entries(file.path()).unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.id, "7");
    assert_eq!(entry.logged_seconds, 5400);
    assert_eq!(entry.author.avatar_url.as_deref(), Some("medium.png"));
    assert_eq!(entry.comment.as_deref(), Some("Pairing session\nFollow-up"));
    assert_eq!(entry.day().to_string(), "2024-01-15");
}

#[test]
fn test_flat_worklog_shape() {
    let raw = json!({
        "worklogs": [{
            "id": "w1",
            "issueKey": "OPS-4",
            "author": { "accountId": "bob", "displayName": "Bob", "avatarUrl": "bob.png" },
            "loggedSeconds": 600,
            "startedAt": "2024-02-29T18:00:00Z",
            "comment": "Deploy"
        }]
    });

    let entries = parse_time_entries(&raw).unwrap();
    assert_eq!(entries[0].author.avatar_url.as_deref(), Some("bob.png"));
    assert_eq!(entries[0].comment.as_deref(), Some("Deploy"));
}

#[test]
fn test_wall_clock_date_is_kept() {
    // 23:30 in UTC-8 is already the next day in UTC, but the written date wins
    let ts = parse_timestamp("2024-01-31T23:30:00-08:00").unwrap();
    assert_eq!(ts.date().to_string(), "2024-01-31");
}

#[test]
fn test_invalid_timestamp() {
    assert!(matches!(
        parse_timestamp("yesterday"),
        Err(ParseError::InvalidTimestamp(_))
    ));
}

#[test]
fn test_range_filter_is_inclusive() {
    let raw = json!([
        { "id": "1", "issueKey": "A-1", "author": { "accountId": "a" },
          "loggedSeconds": 1, "startedAt": "2023-12-31T23:59:59" },
        { "id": "2", "issueKey": "A-1", "author": { "accountId": "a" },
          "loggedSeconds": 1, "startedAt": "2024-01-01T00:00:00" },
        { "id": "3", "issueKey": "A-1", "author": { "accountId": "a" },
          "loggedSeconds": 1, "startedAt": "2024-01-31T23:59:59" },
        { "id": "4", "issueKey": "A-1", "author": { "accountId": "a" },
          "loggedSeconds": 1, "startedAt": "2024-02-01T00:00:00" }
    ]);
    let entries = parse_time_entries(&raw).unwrap();
    let range = DateRange::new(
        "2024-01-01".parse().unwrap(),
        "2024-01-31".parse().unwrap(),
    )
    .unwrap();

    let kept: Vec<String> = filter_entries_by_range(entries, &range)
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(kept, vec!["2", "3"]);
}

#[test]
fn test_missing_container_field() {
    let result = parse_work_items(&json!({ "something": [] }));
    assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
}

#[test]
fn test_empty_array_is_ok() {
    assert!(parse_work_items(&json!([])).unwrap().is_empty());
    assert!(parse_time_entries(&json!({ "entries": [] })).unwrap().is_empty());
}

#[test]
fn test_unreadable_file() {
    let result = read_work_items("/nonexistent/issues.json");
    assert!(matches!(result, Err(ParseError::ReadFailed(_))));
}

#[test]
fn test_invalid_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    assert!(matches!(
        read_time_entries(file.path()),
        Err(ParseError::JsonError(_))
    ));
}
