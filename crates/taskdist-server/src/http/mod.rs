//! HTTP surface of the taskdist backend.
//!
//! Provides endpoints for:
//! - Login (`/api/auth/login`)
//! - Agent management (`/api/agents`)
//! - Task upload, listing, and updates (`/api/tasks`)
//! - Health check (`/health`)

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::pipeline::MAX_UPLOAD_BYTES;
use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer for the frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth routes
        .route("/api/auth/login", post(handlers::login))
        // Agent routes
        .route(
            "/api/agents",
            post(handlers::create_agent).get(handlers::list_agents),
        )
        .route(
            "/api/agents/:id",
            put(handlers::update_agent).delete(handlers::delete_agent),
        )
        // Task routes
        .route("/api/tasks/upload", post(handlers::upload_tasks))
        .route("/api/tasks", get(handlers::list_tasks))
        .route("/api/tasks/agent/:agent_id", get(handlers::agent_tasks))
        .route("/api/tasks/:task_id", put(handlers::update_task))
        // Observability routes
        .route("/health", get(handlers::health_check))
        // Body limit leaves headroom for multipart framing; the pipeline
        // enforces the exact 5 MiB file gate with a 400.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
