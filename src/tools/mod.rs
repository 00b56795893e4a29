//! MCP tool implementations.
//!
//! This module contains the leave tracker tool handlers:
//! - `leave`: submit_leave, update_status and leave_history
//! - `students`: list_students
//! - `greeting`: the `greeting://{name}` resource
//! - `format`: delimited report rendering shared by the listings

pub mod format;
pub mod greeting;
pub mod leave;
pub mod students;

pub use leave::{LeaveHistoryInput, LeaveToolHandler, SubmitLeaveInput, UpdateStatusInput};
pub use students::{ListStudentsInput, StudentToolHandler};
