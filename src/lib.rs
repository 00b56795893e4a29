//! Leave Tracker MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to submit, approve and review student leave requests stored in MySQL.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::TrackerError;
pub use mcp::LeaveTrackerService;
