//! Upload summary aggregation.

use crate::{Agent, Task, UserId};
use serde::{Deserialize, Serialize};

/// Per-agent task count in a distribution summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTaskCount {
    /// Display name of the agent.
    pub agent_name: String,

    /// Number of tasks assigned to this agent in the upload.
    pub task_count: usize,
}

/// Aggregate counts describing one upload's outcome. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    /// Rows that passed validation and were distributed.
    pub total_tasks: usize,

    /// All rows read from the file, valid or not.
    pub total_rows: usize,

    /// Rows dropped by validation (counted, never reported individually).
    pub invalid_rows: usize,

    /// Per-agent counts, ordered by first appearance in the distributed
    /// sequence. Agents that received no tasks produce no entry.
    pub distribution: Vec<AgentTaskCount>,
}

/// Group distributed tasks by assignee and resolve display names from the
/// agent snapshot.
///
/// Entry order is the order agents first appear in `tasks`, not the agent
/// list order. An assignee missing from the snapshot falls back to its raw
/// identifier as the display name.
pub fn distribution_summary(tasks: &[Task], agents: &[Agent]) -> Vec<AgentTaskCount> {
    let mut groups: Vec<(UserId, usize)> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|(id, _)| *id == task.assigned_to) {
            Some((_, count)) => *count += 1,
            None => groups.push((task.assigned_to.clone(), 1)),
        }
    }

    groups
        .into_iter()
        .map(|(id, task_count)| {
            let agent_name = agents
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| id.to_string());
            AgentTaskCount {
                agent_name,
                task_count,
            }
        })
        .collect()
}
