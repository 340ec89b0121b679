//! Authentication: password hashing, bearer tokens, request extractors.
//!
//! Sessions are opaque bearer tokens. We never store the plaintext token -
//! only its SHA-256 hash, with an expiry. The upload pipeline itself never
//! re-checks roles; enforcement happens at the route via the extractors
//! below.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use taskdist_core::UserId;

use crate::http::responses::ErrorBody;
use crate::state::AppState;

/// How long an issued session token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 1;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage agents and upload task files.
    Admin,
    /// Receives distributed tasks.
    Agent,
}

/// A login session stored in the control state, keyed by token hash.
#[derive(Debug, Clone)]
pub struct Session {
    /// SHA-256 hash of the bearer token (hex encoded).
    pub token_hash: String,

    /// Account this session belongs to.
    pub user_id: UserId,

    /// When the session was created.
    pub created_at: DateTime<Utc>,

    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session entry from a token hash.
    pub fn new(token_hash: String, user_id: UserId, validity_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            token_hash,
            user_id,
            created_at: now,
            expires_at: now + Duration::hours(validity_hours),
        }
    }

    /// Check if the session is still valid.
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// Generate a new session token.
///
/// Returns a tuple of (plaintext_token, token_hash). The plaintext goes to
/// the client; only the hash is stored server-side.
pub fn generate_session_token() -> (String, String) {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut token_bytes);

    let plaintext = URL_SAFE_NO_PAD.encode(token_bytes);
    let token_hash = hash_token(&plaintext);

    (plaintext, token_hash)
}

/// Hash a token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a password with a fresh random salt. Stored as `salt$digest`, both
/// hex encoded.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), digest)
}

/// Verify a password against a stored `salt$digest` hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    salted_digest(&salt, password) == digest
}

fn salted_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authentication/authorization failures at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header or not a Bearer token.
    #[error("Missing authentication token")]
    MissingToken,

    /// Unknown, expired, or orphaned token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Authenticated but not an admin.
    #[error("Admin access required")]
    Forbidden,
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let token_hash = hash_token(token);
        let user_id = {
            let sessions = state.sessions.read().await;
            match sessions.get(&token_hash) {
                Some(session) if session.is_valid() => session.user_id.clone(),
                _ => return Err(AuthError::InvalidToken),
            }
        };

        let users = state.users.read().await;
        let user = users.get(&user_id).ok_or(AuthError::InvalidToken)?;
        Ok(CurrentUser {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
        })
    }
}

/// Extractor that additionally requires the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AuthError::Forbidden);
        }
        Ok(RequireAdmin(user))
    }
}
