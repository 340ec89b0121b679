//! Agent management handlers. All admin-only.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::info;

use taskdist_core::UserId;

use crate::auth::{hash_password, RequireAdmin, Role};
use crate::http::responses::{
    AgentBody, AgentEnvelope, CreateAgentRequest, ErrorBody, UpdateAgentRequest,
};
use crate::state::{AppState, User};

/// Create a new agent account.
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    Json(req): Json<CreateAgentRequest>,
) -> impl IntoResponse {
    let mut users = state.users.write().await;

    if users.values().any(|u| u.email == req.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Agent with this email already exists")),
        )
            .into_response();
    }

    let agent = User {
        id: UserId::generate(),
        name: req.name,
        email: req.email,
        mobile_number: req.mobile_number,
        country_code: req.country_code,
        password_hash: hash_password(&req.password),
        role: Role::Agent,
        created_at: Utc::now(),
    };
    let body = AgentBody::from_user(&agent);
    info!(agent_id = %agent.id, email = %agent.email, "Agent created");
    users.insert(agent.id.clone(), agent);

    (
        StatusCode::CREATED,
        Json(AgentEnvelope {
            message: "Agent created successfully".to_string(),
            agent: body,
        }),
    )
        .into_response()
}

/// List all agent accounts, newest first.
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
) -> impl IntoResponse {
    let agents: Vec<AgentBody> = state
        .list_agents()
        .await
        .iter()
        .map(AgentBody::from_user)
        .collect();
    Json(agents)
}

/// Update an agent's profile fields.
pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<UpdateAgentRequest>,
) -> impl IntoResponse {
    let mut users = state.users.write().await;

    let Some(agent) = users.get_mut(&UserId::new(id)) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new("Agent not found")),
        )
            .into_response();
    };
    if agent.role != Role::Agent {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Invalid agent ID")),
        )
            .into_response();
    }

    if let Some(name) = req.name {
        agent.name = name;
    }
    if let Some(email) = req.email {
        agent.email = email;
    }
    if let Some(mobile_number) = req.mobile_number {
        agent.mobile_number = mobile_number;
    }
    if let Some(country_code) = req.country_code {
        agent.country_code = country_code;
    }

    info!(agent_id = %agent.id, "Agent updated");
    (
        StatusCode::OK,
        Json(AgentEnvelope {
            message: "Agent updated successfully".to_string(),
            agent: AgentBody::from_user(agent),
        }),
    )
        .into_response()
}

/// Delete an agent account.
pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut users = state.users.write().await;
    let id = UserId::new(id);

    let Some(agent) = users.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new("Agent not found")),
        )
            .into_response();
    };
    if agent.role != Role::Agent {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Invalid agent ID")),
        )
            .into_response();
    }

    users.remove(&id);
    info!(agent_id = %id, "Agent deleted");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Agent deleted successfully" })),
    )
        .into_response()
}
