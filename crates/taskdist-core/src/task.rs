//! Task types: raw upload rows, validated drafts, persisted tasks.

use crate::{TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Required column for the contact's first name.
pub const COL_FIRST_NAME: &str = "FirstName";
/// Required column for the contact's phone number.
pub const COL_PHONE: &str = "Phone";
/// Optional column for free-form notes.
pub const COL_NOTES: &str = "Notes";

/// An untyped row as produced by the file parser: column header to cell value.
///
/// Headers are case- and spelling-sensitive. Exists only during parsing.
pub type RawRow = HashMap<String, String>;

/// A validated, normalized task prior to persistence.
///
/// Only constructible from a [`RawRow`] that passed validation
/// (see [`crate::validate::validate_row`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Contact first name, trimmed, non-empty.
    pub first_name: String,

    /// Contact phone, exactly 10 decimal digits.
    pub phone: String,

    /// Free-form notes, trimmed; empty string if the column was absent.
    pub notes: String,
}

/// A persisted task: a validated draft assigned to exactly one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Contact first name.
    pub first_name: String,

    /// Contact phone number.
    pub phone: String,

    /// Free-form notes.
    pub notes: String,

    /// Agent this task is assigned to. Set once by distribution; later
    /// changes go through the task update endpoint only.
    pub assigned_to: UserId,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// When the task was persisted.
    pub created_at: DateTime<Utc>,

    /// When the task was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialize a draft into a persisted task assigned to one agent.
    pub fn new(draft: TaskDraft, assigned_to: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::generate(),
            first_name: draft.first_name,
            phone: draft.phone,
            notes: draft.notes,
            assigned_to,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TaskDraft {
        TaskDraft {
            first_name: "Bob".to_string(),
            phone: "5551234567".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_new_task_defaults() {
        let agent = UserId::new("agent-1");
        let task = Task::new(draft(), agent.clone());
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.assigned_to, agent);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let task = Task::new(draft(), UserId::new("agent-1"));
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("assignedTo").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
