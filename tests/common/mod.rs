//! Shared SQLite fixture for the integration tests.

#![allow(dead_code)]

use leave_tracker_mcp::config::{DatastoreConfig, DatastoreTarget};
use leave_tracker_mcp::db::{DbPool, LeaveStore};
use leave_tracker_mcp::tools::{LeaveToolHandler, StudentToolHandler};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tempfile::{NamedTempFile, TempPath};

const SCHEMA: &[&str] = &[
    "CREATE TABLE students (
        student_id TEXT PRIMARY KEY,
        student_name TEXT NOT NULL
    )",
    "CREATE TABLE leave_request (
        student_id TEXT NOT NULL,
        date TEXT NOT NULL,
        reason TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        UNIQUE (student_id, date)
    )",
];

/// A leave tracker datastore in a temporary SQLite file.
///
/// The file is removed when the fixture is dropped.
pub struct TestDb {
    pub store: Arc<LeaveStore>,
    pool: SqlitePool,
    _path: TempPath,
}

impl TestDb {
    pub async fn new() -> Self {
        let path = NamedTempFile::new().unwrap().into_temp_path();
        let url = format!("sqlite:{}", path.to_str().unwrap());

        let mut config = DatastoreConfig::new(DatastoreTarget::from_url(&url).unwrap());
        config.pool_options.acquire_timeout_secs = Some(5);
        config.query_timeout = Duration::from_secs(5);

        let pool = DbPool::connect(&config).await.unwrap();
        let sqlite = match &pool {
            DbPool::SQLite(p) => p.clone(),
            other => panic!("expected a SQLite pool, got {:?}", other.db_type()),
        };

        let db = Self {
            store: Arc::new(LeaveStore::new(pool, config.query_timeout)),
            pool: sqlite,
            _path: path,
        };
        for statement in SCHEMA {
            db.exec(statement).await;
        }
        db
    }

    pub fn leave_handler(&self) -> LeaveToolHandler {
        LeaveToolHandler::new(self.store.clone())
    }

    pub fn student_handler(&self, max_limit: u32) -> StudentToolHandler {
        StudentToolHandler::new(self.store.clone(), max_limit)
    }

    pub async fn exec(&self, sql: &str) {
        sqlx::query(sql).execute(&self.pool).await.unwrap();
    }

    pub async fn seed_students(&self, students: &[(&str, &str)]) {
        for (id, name) in students {
            sqlx::query("INSERT INTO students (student_id, student_name) VALUES (?, ?)")
                .bind(id)
                .bind(name)
                .execute(&self.pool)
                .await
                .unwrap();
        }
    }

    pub async fn seed_leave(&self, student_id: &str, date: &str, reason: Option<&str>, status: &str) {
        sqlx::query("INSERT INTO leave_request (student_id, date, reason, status) VALUES (?, ?, ?, ?)")
            .bind(student_id)
            .bind(date)
            .bind(reason)
            .bind(status)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn leave_count(&self, student_id: &str, date: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM leave_request WHERE student_id = ? AND date = ?")
            .bind(student_id)
            .bind(date)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// `(reason, status)` of the stored row, if any.
    pub async fn leave_row(&self, student_id: &str, date: &str) -> Option<(Option<String>, String)> {
        sqlx::query_as("SELECT reason, status FROM leave_request WHERE student_id = ? AND date = ?")
            .bind(student_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .unwrap()
    }
}
