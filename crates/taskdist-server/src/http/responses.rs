//! HTTP request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdist_core::{Task, TaskStatus, UploadSummary};

use crate::auth::Role;
use crate::state::User;

// ============================================================================
// Error body
// ============================================================================

/// Error response. All user-visible failures carry a human-readable
/// `message`; 500-class responses additionally carry `error` detail.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(detail.into()),
        }
    }
}

// ============================================================================
// Auth types
// ============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserBody {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserBody,
}

// ============================================================================
// Agent types
// ============================================================================

/// Request body for agent creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub country_code: String,
    pub password: String,
}

/// Request body for agent updates; absent fields keep their value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub country_code: Option<String>,
}

/// Public view of an agent account, no password material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBody {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub country_code: String,
    pub created_at: DateTime<Utc>,
}

impl AgentBody {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            mobile_number: user.mobile_number.clone(),
            country_code: user.country_code.clone(),
            created_at: user.created_at,
        }
    }
}

/// Message-plus-agent envelope for create/update responses.
#[derive(Debug, Serialize)]
pub struct AgentEnvelope {
    pub message: String,
    pub agent: AgentBody,
}

// ============================================================================
// Task types
// ============================================================================

/// Response body for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub summary: UploadSummary,
    pub tasks: Vec<Task>,
}

/// Assigned-agent reference joined into task listings.
#[derive(Debug, Serialize)]
pub struct AssignedAgentBody {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A task with its assignee resolved, for the list endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody {
    pub id: String,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub status: TaskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<AssignedAgentBody>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskBody {
    /// Join a task with its assignee from the user directory.
    pub fn from_task(task: &Task, assignee: Option<&User>) -> Self {
        Self {
            id: task.id.to_string(),
            first_name: task.first_name.clone(),
            phone: task.phone.clone(),
            notes: task.notes.clone(),
            status: task.status,
            assigned_to: assignee.map(|u| AssignedAgentBody {
                id: u.id.to_string(),
                name: u.name.clone(),
                email: u.email.clone(),
            }),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
