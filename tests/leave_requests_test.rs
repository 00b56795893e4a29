//! Integration tests for submitting, updating and listing leave requests.
//!
//! Tests verify that:
//! - Submits are idempotent per student and date
//! - Status updates overwrite any status and report missing rows
//! - History is newest first and capped at ten rows
//! - Failed writes leave nothing behind

mod common;

use common::TestDb;
use leave_tracker_mcp::db::UpdateResult;
use leave_tracker_mcp::models::{LeaveStatus, OutcomeKind};
use leave_tracker_mcp::tools::{LeaveHistoryInput, SubmitLeaveInput, UpdateStatusInput};

fn submit(student_id: &str, date: &str, reason: &str) -> SubmitLeaveInput {
    SubmitLeaveInput {
        student_id: student_id.to_string(),
        date: date.to_string(),
        reason: reason.to_string(),
    }
}

fn update(student_id: &str, date: &str, new_status: &str) -> UpdateStatusInput {
    UpdateStatusInput {
        student_id: student_id.to_string(),
        date: date.to_string(),
        new_status: new_status.to_string(),
    }
}

fn history(student_id: &str) -> LeaveHistoryInput {
    LeaveHistoryInput {
        student_id: student_id.to_string(),
    }
}

#[tokio::test]
async fn test_submit_creates_pending_request() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();

    let outcome = handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;

    assert_eq!(outcome.kind, OutcomeKind::Success);
    assert_eq!(outcome.message, "✅ Leave submitted for S1 on 2024-01-01.");
    assert_eq!(
        db.leave_row("S1", "2024-01-01").await,
        Some((Some("fever".to_string()), "pending".to_string()))
    );
}

#[tokio::test]
async fn test_second_submit_is_rejected_and_keeps_first_reason() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();

    handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;
    let outcome = handler.submit_leave(submit("S1", "2024-01-01", "travel")).await;

    assert_eq!(outcome.kind, OutcomeKind::AlreadyExists);
    assert_eq!(
        outcome.message,
        "⚠️ Leave already submitted for 2024-01-01 by S1."
    );
    assert_eq!(db.leave_count("S1", "2024-01-01").await, 1);
    assert_eq!(
        db.leave_row("S1", "2024-01-01").await.unwrap().0.as_deref(),
        Some("fever")
    );
}

#[tokio::test]
async fn test_submit_trims_key_and_rejects_blank() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();

    let outcome = handler.submit_leave(submit("  S1 ", " 2024-01-01", "x")).await;
    assert_eq!(outcome.message, "✅ Leave submitted for S1 on 2024-01-01.");
    assert_eq!(db.leave_count("S1", "2024-01-01").await, 1);

    let outcome = handler.submit_leave(submit("   ", "2024-01-02", "x")).await;
    assert_eq!(outcome.kind, OutcomeKind::ValidationError);
    let outcome = handler.submit_leave(submit("S1", "", "x")).await;
    assert_eq!(outcome.kind, OutcomeKind::ValidationError);
}

#[tokio::test]
async fn test_back_to_back_joined_submits_yield_one_success() {
    // The fixture pool holds one connection, so the submits run in turn
    let db = TestDb::new().await;
    let first = db.leave_handler();
    let second = db.leave_handler();

    let (a, b) = tokio::join!(
        first.submit_leave(submit("S9", "2024-03-03", "a")),
        second.submit_leave(submit("S9", "2024-03-03", "b")),
    );

    let mut kinds = vec![a.kind, b.kind];
    kinds.sort_by_key(|kind| *kind == OutcomeKind::AlreadyExists);
    assert_eq!(kinds, vec![OutcomeKind::Success, OutcomeKind::AlreadyExists]);
    assert_eq!(db.leave_count("S9", "2024-03-03").await, 1);
}

#[tokio::test]
async fn test_unique_key_violation_reports_already_exists() {
    let db = TestDb::new().await;
    // The existence check compares exactly; this index also treats case as equal,
    // so only the insert itself can detect the clash.
    db.exec("CREATE UNIQUE INDEX leave_request_nocase ON leave_request (student_id COLLATE NOCASE, date)")
        .await;
    let handler = db.leave_handler();

    handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;
    let outcome = handler.submit_leave(submit("s1", "2024-01-01", "fever")).await;

    assert_eq!(outcome.kind, OutcomeKind::AlreadyExists);
    assert_eq!(
        outcome.message,
        "⚠️ Leave already submitted for 2024-01-01 by s1."
    );
    assert_eq!(db.leave_count("s1", "2024-01-01").await, 0);
}

#[tokio::test]
async fn test_failed_insert_is_rolled_back() {
    let db = TestDb::new().await;
    db.exec(
        "CREATE TRIGGER reject_leave BEFORE INSERT ON leave_request \
         WHEN NEW.reason = 'boom' \
         BEGIN SELECT RAISE(ABORT, 'leave insert rejected'); END",
    )
    .await;
    let handler = db.leave_handler();

    let outcome = handler.submit_leave(submit("S1", "2024-01-01", "boom")).await;

    assert_eq!(outcome.kind, OutcomeKind::DatastoreError);
    assert!(outcome.message.starts_with("❌ Error submitting leave: "));
    assert!(outcome.message.contains("leave insert rejected"));
    assert_eq!(db.leave_count("S1", "2024-01-01").await, 0);

    // The single pooled connection came back usable
    let outcome = handler.submit_leave(submit("S1", "2024-01-01", "fine")).await;
    assert_eq!(outcome.kind, OutcomeKind::Success);
}

#[tokio::test]
async fn test_update_status_overwrites_any_status() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();
    handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;

    for status in ["approved", "rejected", "pending", "approved"] {
        let outcome = handler.update_status(update("S1", "2024-01-01", status)).await;
        assert_eq!(outcome.kind, OutcomeKind::Success);
        assert_eq!(
            outcome.message,
            format!("✅ Leave on 2024-01-01 for S1 marked as '{}'.", status)
        );
        assert_eq!(db.leave_row("S1", "2024-01-01").await.unwrap().1, status);
    }
}

#[tokio::test]
async fn test_update_to_same_status_succeeds() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();
    handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;

    let outcome = handler.update_status(update("S1", "2024-01-01", "pending")).await;
    assert_eq!(outcome.kind, OutcomeKind::Success);
}

#[tokio::test]
async fn test_store_update_counts_matched_rows() {
    let db = TestDb::new().await;
    db.seed_leave("S1", "2024-01-01", Some("fever"), "pending").await;

    let same = db
        .store
        .update_status("S1", "2024-01-01", LeaveStatus::Pending)
        .await
        .unwrap();
    assert_eq!(same, UpdateResult::Updated(1));

    let missing = db
        .store
        .update_status("S1", "2024-02-02", LeaveStatus::Approved)
        .await
        .unwrap();
    assert_eq!(missing, UpdateResult::Missing);
}

#[tokio::test]
async fn test_update_missing_request() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();

    let outcome = handler.update_status(update("S404", "2024-01-01", "approved")).await;

    assert_eq!(outcome.kind, OutcomeKind::NotFound);
    assert_eq!(
        outcome.message,
        "⚠️ No leave request found for S404 on 2024-01-01."
    );
    assert_eq!(db.leave_count("S404", "2024-01-01").await, 0);
}

#[tokio::test]
async fn test_invalid_status_leaves_row_untouched() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();
    handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;

    for status in ["bogus", "Approved", ""] {
        let outcome = handler.update_status(update("S1", "2024-01-01", status)).await;
        assert_eq!(outcome.kind, OutcomeKind::ValidationError);
        assert_eq!(
            outcome.message,
            "❌ Invalid status. Use one of: pending, approved, rejected."
        );
    }
    assert_eq!(db.leave_row("S1", "2024-01-01").await.unwrap().1, "pending");
}

#[tokio::test]
async fn test_invalid_status_never_touches_datastore() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();
    db.store.close().await;

    let outcome = handler.update_status(update("S1", "2024-01-01", "bogus")).await;
    assert_eq!(outcome.kind, OutcomeKind::ValidationError);

    let outcome = handler.update_status(update("S1", "2024-01-01", "approved")).await;
    assert_eq!(outcome.kind, OutcomeKind::DatastoreError);
    assert!(outcome.message.starts_with("❌ Error updating status: "));
}

#[tokio::test]
async fn test_history_newest_first_and_capped() {
    let db = TestDb::new().await;
    for day in 1..=12 {
        db.seed_leave("S1", &format!("2024-01-{:02}", day), Some("r"), "pending")
            .await;
    }
    db.seed_leave("S2", "2024-02-01", Some("other"), "approved").await;

    let outcome = db.leave_handler().leave_history(history("S1")).await;

    assert_eq!(outcome.kind, OutcomeKind::Success);
    let lines: Vec<&str> = outcome.message.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "student_id, date, reason, status");
    assert_eq!(lines[1], "S1, 2024-01-12, r, pending");
    assert_eq!(lines[10], "S1, 2024-01-03, r, pending");
    assert!(!outcome.message.contains("S2"));
}

#[tokio::test]
async fn test_history_after_submit_and_update() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();
    handler.submit_leave(submit("S1", "2024-01-01", "fever")).await;
    handler.submit_leave(submit("S1", "2024-01-05", "travel")).await;
    handler.update_status(update("S1", "2024-01-01", "approved")).await;

    let outcome = handler.leave_history(history("S1")).await;

    assert_eq!(
        outcome.message,
        "student_id, date, reason, status\n\
         S1, 2024-01-05, travel, pending\n\
         S1, 2024-01-01, fever, approved"
    );
}

#[tokio::test]
async fn test_history_sorts_out_of_order_submits() {
    let db = TestDb::new().await;
    let handler = db.leave_handler();
    for date in ["2024-01-01", "2024-01-05", "2024-01-03"] {
        handler.submit_leave(submit("S1", date, "r")).await;
    }

    let outcome = handler.leave_history(history("S1")).await;

    let dates: Vec<&str> = outcome
        .message
        .lines()
        .skip(1)
        .map(|line| line.split(", ").nth(1).unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-03", "2024-01-01"]);
}

#[tokio::test]
async fn test_history_renders_null_reason() {
    let db = TestDb::new().await;
    db.seed_leave("S1", "2024-01-01", None, "rejected").await;

    let outcome = db.leave_handler().leave_history(history("S1")).await;
    assert!(outcome.message.ends_with("S1, 2024-01-01, NULL, rejected"));
}

#[tokio::test]
async fn test_history_empty() {
    let db = TestDb::new().await;

    let outcome = db.leave_handler().leave_history(history("S1")).await;

    assert_eq!(outcome.kind, OutcomeKind::Empty);
    assert_eq!(outcome.message, "📭 No leave history found.");
}

#[tokio::test]
async fn test_history_blank_student_is_empty() {
    let db = TestDb::new().await;
    db.seed_leave("S1", "2024-01-01", Some("fever"), "pending").await;

    for student_id in ["", "   "] {
        let outcome = db.leave_handler().leave_history(history(student_id)).await;
        assert_eq!(outcome.kind, OutcomeKind::Empty);
        assert_eq!(outcome.message, "📭 No leave history found.");
    }
}

#[tokio::test]
async fn test_history_reports_missing_table() {
    let db = TestDb::new().await;
    db.exec("DROP TABLE leave_request").await;

    let outcome = db.leave_handler().leave_history(history("S1")).await;

    assert_eq!(outcome.kind, OutcomeKind::DatastoreError);
    assert!(outcome.message.starts_with("❌ Error fetching history: "));
    assert!(outcome.message.contains("leave_request"));
}
