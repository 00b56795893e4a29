//! Leave request tools.
//!
//! This module implements the `submit_leave`, `update_status` and
//! `leave_history` MCP tools. Every failure is absorbed into an [`Outcome`];
//! none of these handlers returns a protocol error.

use crate::db::{InsertResult, LEAVE_HISTORY_LIMIT, LeaveStore, UpdateResult};
use crate::models::{LeaveStatus, Outcome};
use crate::tools::format::format_delimited;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Input for the submit_leave tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubmitLeaveInput {
    /// Student identifier, e.g. "S1024"
    pub student_id: String,
    /// Day of leave as YYYY-MM-DD
    pub date: String,
    /// Free-text reason for the leave
    pub reason: String,
}

/// Input for the update_status tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateStatusInput {
    /// Student identifier of the leave request
    pub student_id: String,
    /// Day of the leave request as YYYY-MM-DD
    pub date: String,
    /// One of: pending, approved, rejected (lowercase, exact)
    pub new_status: String,
}

/// Input for the leave_history tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LeaveHistoryInput {
    /// Student identifier whose leave requests are listed
    pub student_id: String,
}

pub struct LeaveToolHandler {
    store: Arc<LeaveStore>,
}

impl LeaveToolHandler {
    pub fn new(store: Arc<LeaveStore>) -> Self {
        Self { store }
    }

    pub async fn submit_leave(&self, input: SubmitLeaveInput) -> Outcome {
        let (student_id, date) = match required_key(&input.student_id, &input.date) {
            Ok(key) => key,
            Err(outcome) => return outcome,
        };

        let start = Instant::now();
        match self.store.insert_leave(student_id, date, &input.reason).await {
            Ok(InsertResult::Inserted) => {
                info!(
                    student_id = %student_id,
                    date = %date,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Leave submitted"
                );
                Outcome::success(format!(
                    "✅ Leave submitted for {} on {}.",
                    student_id, date
                ))
            }
            Ok(InsertResult::Duplicate) => Outcome::already_exists(format!(
                "⚠️ Leave already submitted for {} by {}.",
                date, student_id
            )),
            Err(e) => {
                warn!(student_id = %student_id, date = %date, error = %e, "Submit failed");
                Outcome::datastore_error("submitting leave", &e)
            }
        }
    }

    pub async fn update_status(&self, input: UpdateStatusInput) -> Outcome {
        let Ok(status) = input.new_status.parse::<LeaveStatus>() else {
            return Outcome::validation_error(
                "❌ Invalid status. Use one of: pending, approved, rejected.",
            );
        };
        let (student_id, date) = match required_key(&input.student_id, &input.date) {
            Ok(key) => key,
            Err(outcome) => return outcome,
        };

        let start = Instant::now();
        match self.store.update_status(student_id, date, status).await {
            Ok(UpdateResult::Missing) => Outcome::not_found(format!(
                "⚠️ No leave request found for {} on {}.",
                student_id, date
            )),
            Ok(UpdateResult::Updated(rows_affected)) => {
                info!(
                    student_id = %student_id,
                    date = %date,
                    status = %status,
                    rows_affected,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Leave status updated"
                );
                Outcome::success(format!(
                    "✅ Leave on {} for {} marked as '{}'.",
                    date, student_id, status
                ))
            }
            Err(e) => {
                warn!(student_id = %student_id, date = %date, error = %e, "Status update failed");
                Outcome::datastore_error("updating status", &e)
            }
        }
    }

    pub async fn leave_history(&self, input: LeaveHistoryInput) -> Outcome {
        // A blank id owns no requests
        let student_id = input.student_id.trim();
        if student_id.is_empty() {
            return Outcome::empty("📭 No leave history found.");
        }

        match self.store.leave_history(student_id, LEAVE_HISTORY_LIMIT).await {
            Ok(rows) if rows.is_empty() => Outcome::empty("📭 No leave history found."),
            Ok(rows) => Outcome::success(format_delimited(&rows)),
            Err(e) => {
                warn!(student_id = %student_id, error = %e, "History query failed");
                Outcome::datastore_error("fetching history", &e)
            }
        }
    }
}

/// Trim the `(student_id, date)` key, rejecting empty parts.
fn required_key<'a>(student_id: &'a str, date: &'a str) -> Result<(&'a str, &'a str), Outcome> {
    let student_id = student_id.trim();
    let date = date.trim();
    if student_id.is_empty() {
        return Err(Outcome::validation_error("❌ student_id must not be empty."));
    }
    if date.is_empty() {
        return Err(Outcome::validation_error("❌ date must not be empty."));
    }
    Ok((student_id, date))
}
