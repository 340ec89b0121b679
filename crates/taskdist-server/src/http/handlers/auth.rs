//! Login handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, warn};

use crate::auth::{generate_session_token, verify_password, Session, TOKEN_TTL_HOURS};
use crate::http::responses::{ErrorBody, LoginRequest, LoginResponse, UserBody};
use crate::state::AppState;

/// Login endpoint: verifies credentials and issues a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the client.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = state.find_user_by_email(&req.email).await;

    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            warn!(email = %req.email, "Login rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new("Invalid credentials")),
            )
                .into_response();
        }
    };

    let (token, token_hash) = generate_session_token();
    let session = Session::new(token_hash.clone(), user.id.clone(), TOKEN_TTL_HOURS);
    state.sessions.write().await.insert(token_hash, session);

    info!(user_id = %user.id, role = ?user.role, "Login succeeded");
    (
        StatusCode::OK,
        Json(LoginResponse {
            token,
            user: UserBody::from_user(&user),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hash_password, Role};
    use crate::state::User;
    use axum::response::Response;
    use chrono::Utc;
    use taskdist_core::UserId;

    async fn seed_user(state: &Arc<AppState>, email: &str, password: &str) {
        let user = User {
            id: UserId::generate(),
            name: "Admin".to_string(),
            email: email.to_string(),
            mobile_number: String::new(),
            country_code: String::new(),
            password_hash: hash_password(password),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        state.users.write().await.insert(user.id.clone(), user);
    }

    async fn do_login(state: &Arc<AppState>, email: &str, password: &str) -> Response {
        login(
            State(state.clone()),
            Json(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn test_login_issues_session() {
        let state = AppState::new();
        seed_user(&state, "a@b.c", "pw").await;

        let resp = do_login(&state, "a@b.c", "pw").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let state = AppState::new();
        seed_user(&state, "a@b.c", "pw").await;

        let wrong = do_login(&state, "a@b.c", "nope").await;
        assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);

        let unknown = do_login(&state, "x@y.z", "pw").await;
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
        assert!(state.sessions.read().await.is_empty());
    }
}
