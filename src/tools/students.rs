//! Student listing tool.

use crate::db::LeaveStore;
use crate::models::Outcome;
use crate::tools::format::format_delimited;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Input for the list_students tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListStudentsInput {
    /// Maximum number of students to return. Default: 100; capped by the server
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of students to skip, ordered by name. Default: 0
    #[serde(default)]
    pub offset: u32,
}

impl Default for ListStudentsInput {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

pub struct StudentToolHandler {
    store: Arc<LeaveStore>,
    max_limit: u32,
}

impl StudentToolHandler {
    pub fn new(store: Arc<LeaveStore>, max_limit: u32) -> Self {
        Self { store, max_limit }
    }

    /// The page size actually requested from the datastore.
    pub fn effective_limit(&self, requested: u32) -> u32 {
        requested.min(self.max_limit)
    }

    pub async fn list_students(&self, input: ListStudentsInput) -> Outcome {
        let limit = self.effective_limit(input.limit);
        if limit < input.limit {
            debug!(requested = input.limit, limit, "Clamped student page size");
        }

        match self.store.list_students(limit, input.offset).await {
            Ok(rows) if rows.is_empty() => Outcome::empty("📭 No students found."),
            Ok(rows) => Outcome::success(format_delimited(&rows)),
            Err(e) => {
                warn!(error = %e, "Student listing failed");
                Outcome::datastore_error("listing students", &e)
            }
        }
    }
}
