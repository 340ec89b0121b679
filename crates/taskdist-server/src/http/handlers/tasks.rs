//! Task handlers: file upload plus listing and status updates.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use taskdist_core::{TaskId, TaskStatus, UserId};

use crate::auth::{CurrentUser, RequireAdmin, Role};
use crate::http::responses::{ErrorBody, TaskBody, UploadResponse};
use crate::pipeline::{self, UploadPayload};
use crate::state::AppState;

/// Upload a task file, distribute it across agents, and persist the tasks.
///
/// Multipart field `file`; the pipeline enforces the extension and size
/// gates and guarantees temp-file cleanup on every exit path.
pub async fn upload_tasks(
    State(state): State<Arc<AppState>>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> Response {
    let mut payload: Option<UploadPayload> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        payload = Some(UploadPayload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read upload body");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorBody::new("Failed to read uploaded file")),
                        )
                            .into_response();
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed multipart request");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new("Malformed multipart request")),
                )
                    .into_response();
            }
        }
    }

    match pipeline::process_upload(&state, payload).await {
        Ok(outcome) => {
            info!(
                admin = %admin.id,
                total_tasks = outcome.summary.total_tasks,
                "Upload accepted"
            );
            (
                StatusCode::CREATED,
                Json(UploadResponse {
                    message: "Tasks uploaded and distributed successfully".to_string(),
                    summary: outcome.summary,
                    tasks: outcome.tasks,
                }),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List all tasks, newest first, with assignees resolved.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
) -> impl IntoResponse {
    let tasks = state.list_tasks().await;
    let users = state.users.read().await;
    let body: Vec<TaskBody> = tasks
        .iter()
        .map(|t| TaskBody::from_task(t, users.get(&t.assigned_to)))
        .collect();
    Json(body)
}

/// List tasks assigned to one agent, newest first.
pub async fn agent_tasks(
    State(state): State<Arc<AppState>>,
    _admin: RequireAdmin,
    Path(agent_id): Path<String>,
) -> impl IntoResponse {
    let agent_id = UserId::new(agent_id);
    let tasks = state.tasks_for_agent(&agent_id).await;
    let users = state.users.read().await;
    let body: Vec<TaskBody> = tasks
        .iter()
        .map(|t| TaskBody::from_task(t, users.get(&t.assigned_to)))
        .collect();
    Json(body)
}

/// Update a task's `status` and/or `notes`. Any other field is rejected.
///
/// Admins can update any task; agents only their own.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(task_id): Path<String>,
    Json(updates): Json<serde_json::Value>,
) -> Response {
    let Some(fields) = updates.as_object() else {
        return invalid_updates();
    };
    if fields.is_empty() || !fields.keys().all(|k| k == "status" || k == "notes") {
        return invalid_updates();
    }

    let status = match fields.get("status") {
        Some(value) => match serde_json::from_value::<TaskStatus>(value.clone()) {
            Ok(status) => Some(status),
            Err(_) => return invalid_updates(),
        },
        None => None,
    };
    let notes = match fields.get("notes") {
        Some(value) => match value.as_str() {
            Some(notes) => Some(notes.to_string()),
            None => return invalid_updates(),
        },
        None => None,
    };

    let mut tasks = state.tasks.write().await;
    let Some(task) = tasks.get_mut(&TaskId::new(task_id)) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new("Task not found")),
        )
            .into_response();
    };

    if user.role != Role::Admin && task.assigned_to != user.id {
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorBody::new("Not authorized to update this task")),
        )
            .into_response();
    }

    if let Some(status) = status {
        task.status = status;
    }
    if let Some(notes) = notes {
        task.notes = notes;
    }
    task.updated_at = Utc::now();

    info!(task_id = %task.id, user_id = %user.id, "Task updated");
    (StatusCode::OK, Json(task.clone())).into_response()
}

fn invalid_updates() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("Invalid updates!")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdist_core::{Task, TaskDraft};

    async fn seeded_task(state: &Arc<AppState>, agent: &UserId) -> Task {
        let task = Task::new(
            TaskDraft {
                first_name: "Ann".to_string(),
                phone: "5550001111".to_string(),
                notes: String::new(),
            },
            agent.clone(),
        );
        state
            .tasks
            .write()
            .await
            .insert(task.id.clone(), task.clone());
        task
    }

    fn admin_user() -> CurrentUser {
        CurrentUser {
            id: UserId::new("admin"),
            name: "Admin".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_fields() {
        let state = AppState::new();
        let agent = UserId::new("agent-1");
        let task = seeded_task(&state, &agent).await;

        let resp = update_task(
            State(state),
            admin_user(),
            Path(task.id.to_string()),
            Json(serde_json::json!({ "phone": "0000000000" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_applies_status_and_notes() {
        let state = AppState::new();
        let agent = UserId::new("agent-1");
        let task = seeded_task(&state, &agent).await;

        let resp = update_task(
            State(state.clone()),
            admin_user(),
            Path(task.id.to_string()),
            Json(serde_json::json!({ "status": "In Progress", "notes": "called" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let tasks = state.tasks.read().await;
        let updated = tasks.get(&task.id).unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.notes, "called");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_agent_cannot_touch_others_tasks() {
        let state = AppState::new();
        let owner = UserId::new("agent-1");
        let task = seeded_task(&state, &owner).await;

        let intruder = CurrentUser {
            id: UserId::new("agent-2"),
            name: "Other".to_string(),
            role: Role::Agent,
        };
        let resp = update_task(
            State(state),
            intruder,
            Path(task.id.to_string()),
            Json(serde_json::json!({ "status": "Completed" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_task_is_404() {
        let state = AppState::new();
        let resp = update_task(
            State(state),
            admin_user(),
            Path("missing".to_string()),
            Json(serde_json::json!({ "notes": "x" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
