//! Core domain errors.

use thiserror::Error;

/// Core domain errors for taskdist.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Distribution requested against an empty agent pool.
    #[error("Cannot distribute tasks: agent pool is empty")]
    EmptyAgentPool,

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
