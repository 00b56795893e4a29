//! Error types for the Leave Tracker MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Tool handlers absorb these into outcomes; the transport and resource layers
//! convert them into MCP error responses.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "23000" for an integrity constraint violation
        sql_state: Option<String>,
        /// Set when the datastore rejected a duplicate key
        unique_violation: bool,
        suggestion: String,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TrackerError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            unique_violation: false,
            suggestion: suggestion.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a resource not found error.
    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound { uri: uri.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Check if the datastore rejected the statement because of a duplicate key.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Database {
                unique_violation: true,
                ..
            }
        )
    }
}

/// Convert sqlx errors to TrackerError.
impl From<sqlx::Error> for TrackerError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => TrackerError::connection(
                msg.to_string(),
                "Check the datastore host, port and credentials",
            ),
            sqlx::Error::Database(db_err) => TrackerError::Database {
                message: db_err.message().to_string(),
                sql_state: db_err.code().map(|c| c.to_string()),
                unique_violation: db_err.is_unique_violation(),
                suggestion: "Check that the leave_request and students tables exist and the values match their column types".to_string(),
            },
            sqlx::Error::RowNotFound => TrackerError::database(
                "No rows returned",
                None,
                "Verify the student_id and date match an existing row",
            ),
            sqlx::Error::PoolTimedOut => TrackerError::connection(
                "Timed out acquiring a pooled connection",
                "Increase --acquire-timeout or --max-connections",
            ),
            sqlx::Error::PoolClosed => {
                TrackerError::connection("Connection pool is closed", "Restart the server")
            }
            sqlx::Error::Io(io_err) => TrackerError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => TrackerError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => TrackerError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnNotFound(col) => {
                TrackerError::internal(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                TrackerError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                TrackerError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => TrackerError::internal("Database worker crashed"),
            _ => TrackerError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for leave tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert TrackerError to MCP ErrorData for semantic error categorization.
/// Includes the suggestion field in the `data` object when available.
impl From<TrackerError> for rmcp::ErrorData {
    fn from(err: TrackerError) -> Self {
        match &err {
            TrackerError::InvalidInput { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), suggestion_data(err.suggestion()))
            }

            TrackerError::ResourceNotFound { .. } => rmcp::ErrorData::resource_not_found(
                err.to_string(),
                suggestion_data(Some("Use a URI of the form greeting://{name}")),
            ),

            // Connection, Timeout -> internal_error
            TrackerError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(Some(suggestion)))
            }
            TrackerError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some("Consider increasing --query-timeout")),
            ),

            // Database errors -> invalid_params with sql_state in message
            TrackerError::Database {
                message,
                sql_state,
                suggestion,
                ..
            } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::invalid_params(msg, suggestion_data(Some(suggestion)))
            }

            TrackerError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}
