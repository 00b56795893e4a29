//! Leave request and student records.
//!
//! Both tables are owned by the datastore; these types only mirror the
//! columns this server reads and writes.

use crate::error::TrackerError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a leave request.
///
/// New requests start as `pending`. Any status may be overwritten by any
/// other; there is no terminal state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// All accepted statuses, in the order they are listed to callers.
    pub const ALL: [LeaveStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Value stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the exact lowercase column value; `"Approved"` is rejected.
impl FromStr for LeaveStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                TrackerError::invalid_input(format!(
                    "unknown leave status '{}', expected one of: pending, approved, rejected",
                    s
                ))
            })
    }
}

/// A row of the `leave_request` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRecord {
    pub student_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// NULL in the datastore is kept as `None`
    pub reason: Option<String>,
    /// Raw column value; rows written by other tools may hold anything
    pub status: String,
}

/// A row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub student_name: String,
}
