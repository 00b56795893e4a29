//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Connection pool management
//! - Leave request and student statements
//! - Database dispatch macros for reducing code duplication

#[macro_use]
pub mod macros;
pub mod pool;
pub mod store;

pub use macros::DatabaseType;
pub use pool::DbPool;
pub use store::{InsertResult, LEAVE_HISTORY_LIMIT, LeaveStore, UpdateResult};
