//! HTTP request handlers.

mod agents;
mod auth;
mod health;
mod tasks;

pub use agents::{create_agent, delete_agent, list_agents, update_agent};
pub use auth::login;
pub use health::health_check;
pub use tasks::{agent_tasks, list_tasks, update_task, upload_tasks};
