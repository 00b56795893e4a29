//! Output formatting utilities for MCP tools.
//!
//! Reports are a header line of column names followed by one line per row,
//! each the row's values joined with `", "` in column order.

use crate::models::{LeaveRecord, StudentRecord};

/// Rendered in place of a NULL column value.
const NULL_TEXT: &str = "NULL";

/// A record that renders as one line of a delimited report.
pub trait DelimitedRow {
    /// Column names in output order.
    const COLUMNS: &'static [&'static str];

    /// Field values in the same order as [`Self::COLUMNS`].
    fn values(&self) -> Vec<&str>;
}

impl DelimitedRow for LeaveRecord {
    const COLUMNS: &'static [&'static str] = &["student_id", "date", "reason", "status"];

    fn values(&self) -> Vec<&str> {
        vec![
            self.student_id.as_str(),
            self.date.as_str(),
            self.reason.as_deref().unwrap_or(NULL_TEXT),
            self.status.as_str(),
        ]
    }
}

impl DelimitedRow for StudentRecord {
    const COLUMNS: &'static [&'static str] = &["student_id", "student_name"];

    fn values(&self) -> Vec<&str> {
        vec![self.student_id.as_str(), self.student_name.as_str()]
    }
}

/// Render a header plus one line per row.
pub fn format_delimited<R: DelimitedRow>(rows: &[R]) -> String {
    std::iter::once(R::COLUMNS.join(", "))
        .chain(rows.iter().map(|row| row.values().join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(date: &str, reason: Option<&str>, status: &str) -> LeaveRecord {
        LeaveRecord {
            student_id: "S1".to_string(),
            date: date.to_string(),
            reason: reason.map(String::from),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_leave_report() {
        let rows = vec![
            leave("2024-01-05", Some("fever"), "approved"),
            leave("2024-01-01", Some("travel"), "pending"),
        ];
        assert_eq!(
            format_delimited(&rows),
            "student_id, date, reason, status\n\
             S1, 2024-01-05, fever, approved\n\
             S1, 2024-01-01, travel, pending"
        );
    }

    #[test]
    fn test_null_reason_rendered() {
        let rows = vec![leave("2024-02-02", None, "pending")];
        assert!(format_delimited(&rows).ends_with("S1, 2024-02-02, NULL, pending"));
    }

    #[test]
    fn test_student_report() {
        let rows = vec![StudentRecord {
            student_id: "S7".to_string(),
            student_name: "Ann".to_string(),
        }];
        assert_eq!(format_delimited(&rows), "student_id, student_name\nS7, Ann");
    }

    #[test]
    fn test_no_rows_is_header_only() {
        let rows: Vec<StudentRecord> = Vec::new();
        assert_eq!(format_delimited(&rows), "student_id, student_name");
    }
}
