//! Status enum for Tasks.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a distributed Task.
///
/// Wire form matches the stored data: "Pending", "In Progress", "Completed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task assigned but not yet started by the agent.
    #[default]
    Pending,
    /// Agent is actively working the task.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task finished.
    Completed,
}

impl TaskStatus {
    /// Returns true if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the task still needs agent attention.
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"Pending\"").unwrap(),
            TaskStatus::Pending
        );
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }
}
