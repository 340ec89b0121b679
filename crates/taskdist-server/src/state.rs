//! Shared application state: the in-memory document store.
//!
//! All durable state (users and tasks) lives here behind `RwLock`s. The
//! upload pipeline takes an ordered agent snapshot at its start and is
//! otherwise unaware of concurrent requests; task writes are independent
//! single-document inserts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use taskdist_core::{Agent, Task, TaskId, UserId};

use crate::auth::{hash_password, Role, Session};
use crate::config::Config;

/// Store-level failures. In-memory writes do not fail in practice, but the
/// error surface is kept so alternative backends (and failure-injecting
/// tests) can exercise the mid-batch failure path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A task insert failed.
    #[error("task write failed: {0}")]
    TaskWrite(String),
}

/// A user account: an admin or an agent.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account identifier.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Login email, unique across accounts.
    pub email: String,

    /// Contact number, digits only.
    pub mobile_number: String,

    /// Dialing prefix, e.g. "+1".
    pub country_code: String,

    /// Salted password hash (see [`crate::auth`]).
    pub password_hash: String,

    /// Account role.
    pub role: Role,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Shared application state.
pub struct AppState {
    /// User accounts indexed by UserId.
    pub users: RwLock<HashMap<UserId, User>>,

    /// Tasks indexed by TaskId.
    pub tasks: RwLock<HashMap<TaskId, Task>>,

    /// Active sessions indexed by token hash.
    pub sessions: RwLock<HashMap<String, Session>>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Ensure the configured admin account exists.
    pub async fn seed_admin(&self, config: &Config) {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == config.admin_email) {
            return;
        }
        let admin = User {
            id: UserId::generate(),
            name: config.admin_name.clone(),
            email: config.admin_email.clone(),
            mobile_number: String::new(),
            country_code: String::new(),
            password_hash: hash_password(&config.admin_password),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        info!(email = %admin.email, "Seeded admin account");
        users.insert(admin.id.clone(), admin);
    }

    /// Look up a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.email == email).cloned()
    }

    /// Ordered snapshot of the agent directory for one distribution run.
    ///
    /// Ordering is by creation time with id as tie-break - assignment is
    /// positional, so this must never be raw map iteration order.
    pub async fn find_agents(&self) -> Vec<Agent> {
        let users = self.users.read().await;
        let mut agents: Vec<&User> = users.values().filter(|u| u.role == Role::Agent).collect();
        agents.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        agents
            .into_iter()
            .map(|u| Agent::new(u.id.clone(), u.name.clone()))
            .collect()
    }

    /// All agent accounts, newest first.
    pub async fn list_agents(&self) -> Vec<User> {
        let users = self.users.read().await;
        let mut agents: Vec<User> = users
            .values()
            .filter(|u| u.role == Role::Agent)
            .cloned()
            .collect();
        agents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        agents
    }

    /// All tasks, newest first.
    pub async fn list_tasks(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Tasks assigned to one agent, newest first.
    pub async fn tasks_for_agent(&self, agent_id: &UserId) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut mine: Vec<Task> = tasks
            .values()
            .filter(|t| &t.assigned_to == agent_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    /// Get the number of user accounts.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Get the number of tasks.
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}
