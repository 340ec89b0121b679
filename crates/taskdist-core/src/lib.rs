//! Taskdist Core Domain Types
//!
//! This crate contains pure domain types and logic with no dependencies on:
//! - Network/HTTP
//! - Database
//! - Runtime specifics
//!
//! It covers the algorithmic heart of taskdist: row validation, the
//! round-robin distribution formula, and upload summary aggregation.

pub mod agent;
pub mod distribute;
pub mod error;
pub mod ids;
pub mod status;
pub mod summary;
pub mod task;
pub mod validate;

// Re-export commonly used types
pub use agent::Agent;
pub use distribute::DistributionPlan;
pub use error::CoreError;
pub use ids::{TaskId, UserId};
pub use status::TaskStatus;
pub use summary::{distribution_summary, AgentTaskCount, UploadSummary};
pub use task::{RawRow, Task, TaskDraft, COL_FIRST_NAME, COL_NOTES, COL_PHONE};
pub use validate::validate_row;
