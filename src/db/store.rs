//! Leave request and student statements.
//!
//! `LeaveStore` owns the process-wide pool and runs the handful of
//! parameterized statements the tools need. Writes run inside a transaction
//! that is committed on success and rolled back on any error; reads go
//! straight to the pool. Every statement is bounded by the query timeout.
//!
//! # Architecture
//!
//! The statements are identical for MySQL and SQLite (both use `?`
//! placeholders), so the backend modules are generated by `leave_backend!`
//! and only differ in their pool and connection types.

use crate::db::pool::DbPool;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{LeaveRecord, LeaveStatus, StudentRecord};
use sqlx::{Database, Transaction};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Number of most recent leave requests rendered by `leave_history`.
pub const LEAVE_HISTORY_LIMIT: u32 = 10;

const EXISTS_SQL: &str = "SELECT 1 FROM leave_request WHERE student_id = ? AND date = ?";

const INSERT_SQL: &str =
    "INSERT INTO leave_request (student_id, date, reason, status) VALUES (?, ?, ?, ?)";

const UPDATE_STATUS_SQL: &str =
    "UPDATE leave_request SET status = ? WHERE student_id = ? AND date = ?";

// Identifier and date are read back as text so both backends render them alike.
// ORDER BY names the table column; the `date` alias would sort the text copy.
const HISTORY_SQL: &str = "SELECT CAST(student_id AS CHAR) AS student_id, \
     CAST(date AS CHAR) AS date, reason, status \
     FROM leave_request WHERE student_id = ? \
     ORDER BY leave_request.date DESC LIMIT ?";

const STUDENTS_SQL: &str = "SELECT CAST(student_id AS CHAR) AS student_id, student_name \
     FROM students ORDER BY student_name LIMIT ? OFFSET ?";

/// Result of submitting a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// A new `pending` row was written
    Inserted,
    /// A row for the same student and date already exists; nothing was written
    Duplicate,
}

/// Result of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// Rows matched by the student and date
    Updated(u64),
    /// No row matches the student and date
    Missing,
}

/// Statement runner over the shared pool.
#[derive(Debug, Clone)]
pub struct LeaveStore {
    pool: DbPool,
    query_timeout: Duration,
}

impl LeaveStore {
    pub fn new(pool: DbPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Insert a `pending` leave request unless one exists for `(student_id, date)`.
    ///
    /// The existence check and the insert share one transaction. A unique-key
    /// violation from the insert (a concurrent submit won the race) is
    /// reported as [`InsertResult::Duplicate`].
    pub async fn insert_leave(
        &self,
        student_id: &str,
        date: &str,
        reason: &str,
    ) -> TrackerResult<InsertResult> {
        debug!(student_id = %student_id, date = %date, "Inserting leave request");
        let limit = self.query_timeout;
        impl_db_dispatch!(&self.pool, {
            MySql(p) => mysql::insert_leave(p, student_id, date, reason, limit).await,
            SQLite(p) => sqlite::insert_leave(p, student_id, date, reason, limit).await,
        })
    }

    /// Overwrite the status of the leave request for `(student_id, date)`.
    pub async fn update_status(
        &self,
        student_id: &str,
        date: &str,
        status: LeaveStatus,
    ) -> TrackerResult<UpdateResult> {
        debug!(student_id = %student_id, date = %date, status = %status, "Updating leave status");
        let limit = self.query_timeout;
        impl_db_dispatch!(&self.pool, {
            MySql(p) => mysql::update_status(p, student_id, date, status, limit).await,
            SQLite(p) => sqlite::update_status(p, student_id, date, status, limit).await,
        })
    }

    /// Most recent leave requests of a student, newest first.
    pub async fn leave_history(
        &self,
        student_id: &str,
        max_rows: u32,
    ) -> TrackerResult<Vec<LeaveRecord>> {
        debug!(student_id = %student_id, max_rows, "Fetching leave history");
        let limit = self.query_timeout;
        impl_db_dispatch!(&self.pool, {
            MySql(p) => mysql::leave_history(p, student_id, max_rows, limit).await,
            SQLite(p) => sqlite::leave_history(p, student_id, max_rows, limit).await,
        })
    }

    /// One page of students ordered by name.
    pub async fn list_students(&self, limit: u32, offset: u32) -> TrackerResult<Vec<StudentRecord>> {
        debug!(limit, offset, "Listing students");
        let query_timeout = self.query_timeout;
        impl_db_dispatch!(&self.pool, {
            MySql(p) => mysql::list_students(p, limit, offset, query_timeout).await,
            SQLite(p) => sqlite::list_students(p, limit, offset, query_timeout).await,
        })
    }

    /// Close the pool; in-flight operations finish first.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Common Helper Functions
// =============================================================================

/// Run a driver future under the query timeout.
async fn bounded<T, F>(operation: &str, limit: Duration, future: F) -> TrackerResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(limit, future).await {
        Ok(result) => result.map_err(TrackerError::from),
        Err(_) => Err(TrackerError::timeout(operation, limit.as_secs())),
    }
}

/// Commit on success, roll back on error.
///
/// A transaction dropped without either is rolled back by the driver when
/// its connection returns to the pool.
async fn settle<DB: Database, T>(
    tx: Transaction<'_, DB>,
    result: TrackerResult<T>,
    limit: Duration,
) -> TrackerResult<T> {
    match result {
        Ok(value) => {
            bounded("commit", limit, tx.commit()).await?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

macro_rules! leave_backend {
    ($module:ident, $pool:ty, $conn:ty) => {
        mod $module {
            use super::*;
            use sqlx::Row;

            pub async fn insert_leave(
                pool: &$pool,
                student_id: &str,
                date: &str,
                reason: &str,
                limit: Duration,
            ) -> TrackerResult<InsertResult> {
                let mut tx = bounded("begin transaction", limit, pool.begin()).await?;
                let result = check_and_insert(&mut *tx, student_id, date, reason, limit).await;
                settle(tx, result, limit).await
            }

            async fn check_and_insert(
                conn: &mut $conn,
                student_id: &str,
                date: &str,
                reason: &str,
                limit: Duration,
            ) -> TrackerResult<InsertResult> {
                let existing = bounded(
                    "existence check",
                    limit,
                    sqlx::query(EXISTS_SQL)
                        .bind(student_id)
                        .bind(date)
                        .fetch_optional(&mut *conn),
                )
                .await?;
                if existing.is_some() {
                    return Ok(InsertResult::Duplicate);
                }

                let inserted = bounded(
                    "insert",
                    limit,
                    sqlx::query(INSERT_SQL)
                        .bind(student_id)
                        .bind(date)
                        .bind(reason)
                        .bind(LeaveStatus::Pending.as_str())
                        .execute(&mut *conn),
                )
                .await;

                match inserted {
                    Ok(_) => Ok(InsertResult::Inserted),
                    Err(err) if err.is_unique_violation() => Ok(InsertResult::Duplicate),
                    Err(err) => Err(err),
                }
            }

            pub async fn update_status(
                pool: &$pool,
                student_id: &str,
                date: &str,
                status: LeaveStatus,
                limit: Duration,
            ) -> TrackerResult<UpdateResult> {
                let mut tx = bounded("begin transaction", limit, pool.begin()).await?;
                let result = apply_status(&mut *tx, student_id, date, status, limit).await;
                settle(tx, result, limit).await
            }

            async fn apply_status(
                conn: &mut $conn,
                student_id: &str,
                date: &str,
                status: LeaveStatus,
                limit: Duration,
            ) -> TrackerResult<UpdateResult> {
                let done = bounded(
                    "status update",
                    limit,
                    sqlx::query(UPDATE_STATUS_SQL)
                        .bind(status.as_str())
                        .bind(student_id)
                        .bind(date)
                        .execute(&mut *conn),
                )
                .await?;
                Ok(match done.rows_affected() {
                    0 => UpdateResult::Missing,
                    rows => UpdateResult::Updated(rows),
                })
            }

            pub async fn leave_history(
                pool: &$pool,
                student_id: &str,
                max_rows: u32,
                limit: Duration,
            ) -> TrackerResult<Vec<LeaveRecord>> {
                let rows = bounded(
                    "leave history query",
                    limit,
                    sqlx::query(HISTORY_SQL)
                        .bind(student_id)
                        .bind(i64::from(max_rows))
                        .fetch_all(pool),
                )
                .await?;

                rows.iter()
                    .map(|row| -> Result<LeaveRecord, sqlx::Error> {
                        Ok(LeaveRecord {
                            student_id: row.try_get("student_id")?,
                            date: row.try_get("date")?,
                            reason: row.try_get("reason")?,
                            status: row.try_get("status")?,
                        })
                    })
                    .collect::<Result<Vec<_>, sqlx::Error>>()
                    .map_err(TrackerError::from)
            }

            pub async fn list_students(
                pool: &$pool,
                page_size: u32,
                offset: u32,
                limit: Duration,
            ) -> TrackerResult<Vec<StudentRecord>> {
                let rows = bounded(
                    "student list query",
                    limit,
                    sqlx::query(STUDENTS_SQL)
                        .bind(i64::from(page_size))
                        .bind(i64::from(offset))
                        .fetch_all(pool),
                )
                .await?;

                rows.iter()
                    .map(|row| -> Result<StudentRecord, sqlx::Error> {
                        Ok(StudentRecord {
                            student_id: row.try_get("student_id")?,
                            student_name: row.try_get("student_name")?,
                        })
                    })
                    .collect::<Result<Vec<_>, sqlx::Error>>()
                    .map_err(TrackerError::from)
            }
        }
    };
}

leave_backend!(mysql, sqlx::MySqlPool, sqlx::MySqlConnection);
leave_backend!(sqlite, sqlx::SqlitePool, sqlx::SqliteConnection);
