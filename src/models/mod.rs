//! Data models for the Leave Tracker MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod leave;
pub mod outcome;

// Re-export commonly used types
pub use leave::{LeaveRecord, LeaveStatus, StudentRecord};
pub use outcome::{Outcome, OutcomeKind};
