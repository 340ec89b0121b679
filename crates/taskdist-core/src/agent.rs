//! Agent snapshot type used during distribution.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// An agent as seen by the distribution engine: identifier plus display name.
///
/// The engine treats the agent set as an immutable, explicitly ordered
/// snapshot for the duration of one distribution run. Ordering matters:
/// assignment is by position in the slice, so callers must pass a
/// deterministic sequence, never raw hash-map iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Account identifier of the agent.
    pub id: UserId,

    /// Display name shown in distribution summaries.
    pub name: String,
}

impl Agent {
    /// Create a new Agent snapshot entry.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
