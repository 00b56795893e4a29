//! Structured results returned by every leave tracker tool.
//!
//! Callers branch on [`OutcomeKind`]; the `message` keeps the human-readable
//! text (including tabular reports) that clients have always received.

use crate::error::TrackerError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What happened when a tool ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The operation did what was asked
    Success,
    /// A listing matched no rows
    Empty,
    /// The targeted leave request does not exist
    NotFound,
    /// A leave request for the same student and date already exists
    AlreadyExists,
    /// An argument was rejected before the datastore was touched
    ValidationError,
    /// The datastore failed; any open transaction was rolled back
    DatastoreError,
}

/// Result of a tool call: an outcome kind plus the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Outcome {
    /// Outcome category. Branch on this rather than on the message text.
    pub kind: OutcomeKind,
    /// Human-readable result; tabular reports are newline-separated rows of comma-separated values
    pub message: String,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Success, message)
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Empty, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::AlreadyExists, message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::ValidationError, message)
    }

    /// Datastore failure, prefixed with what was being attempted.
    pub fn datastore_error(action: &str, err: &TrackerError) -> Self {
        Self::new(
            OutcomeKind::DatastoreError,
            format!("❌ Error {}: {}", action, err),
        )
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
