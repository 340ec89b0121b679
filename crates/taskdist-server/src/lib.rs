//! Taskdist Server Library
//!
//! The REST backend for taskdist: administrators upload a spreadsheet of
//! contact records, rows are validated and distributed round-robin across
//! agent accounts, and the resulting tasks are persisted for later status
//! updates.

pub mod auth;
pub mod config;
pub mod http;
pub mod ingest;
pub mod pipeline;
pub mod state;

pub use config::Config;
pub use state::AppState;
