//! The upload pipeline: parse, validate, distribute, summarize.
//!
//! One upload runs start-to-finish with no internal parallelism. The
//! spooled payload is held in a `NamedTempFile`, so it is deleted exactly
//! once on every exit path, success or failure.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{error, info, warn};

use taskdist_core::{
    validate_row, Agent, DistributionPlan, Task, TaskDraft, UploadSummary, UserId,
};

use crate::http::responses::ErrorBody;
use crate::ingest::{self, IngestError, UploadFormat};
use crate::state::{AppState, StoreError};

/// Maximum accepted upload size: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// The raw multipart payload handed to the pipeline.
#[derive(Debug)]
pub struct UploadPayload {
    /// Original client file name; its extension selects the format.
    pub file_name: String,

    /// File bytes.
    pub bytes: Vec<u8>,
}

/// Result of a successful upload run.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Aggregate counts for the response body.
    pub summary: UploadSummary,

    /// The persisted, agent-tagged tasks in input order.
    pub tasks: Vec<Task>,
}

/// Pipeline-level failures. Per-row validation rejections are never errors;
/// they are only counted.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No multipart `file` field present.
    #[error("No file uploaded")]
    NoFile,

    /// Extension outside `.csv` / `.xlsx` / `.xls`, rejected before parsing.
    #[error("Invalid file type. Only CSV, XLSX, and XLS files are allowed.")]
    UnsupportedFormat,

    /// Payload over 5 MiB, rejected before parsing.
    #[error("File size too large. Maximum size is 5MB.")]
    TooLarge,

    /// Zero rows passed validation.
    #[error("No valid tasks found in the file.")]
    NoValidTasks,

    /// Empty agent directory.
    #[error("No agents available for task distribution")]
    NoAgents,

    /// Malformed CSV stream or unreadable workbook.
    #[error("Error processing file")]
    Ingest(#[from] IngestError),

    /// A task write failed mid-distribution. Previously written tasks in
    /// the same batch remain committed; there is no rollback.
    #[error("Error processing file")]
    Store(#[from] StoreError),

    /// Spooling the payload to disk failed.
    #[error("Error processing file")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoFile
            | Self::UnsupportedFormat
            | Self::TooLarge
            | Self::NoValidTasks
            | Self::NoAgents => StatusCode::BAD_REQUEST,
            Self::Ingest(_) | Self::Store(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Detail string for 500-class bodies; client faults carry none.
    fn detail(&self) -> Option<String> {
        match self {
            Self::Ingest(e) => Some(e.to_string()),
            Self::Store(e) => Some(e.to_string()),
            Self::Io(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.detail() {
            Some(detail) => {
                error!(error = %detail, "Upload failed");
                ErrorBody::with_detail(self.to_string(), detail)
            }
            None => {
                warn!(reason = %self, "Upload rejected");
                ErrorBody::new(self.to_string())
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Single-document task insert, awaited once per task.
///
/// The engine performs sequential writes in input order; a failure stops
/// exactly at the task being written and nothing is rolled back.
#[async_trait]
pub trait TaskWriter: Send + Sync {
    async fn create_task(&self, draft: TaskDraft, assigned_to: UserId)
        -> Result<Task, StoreError>;
}

#[async_trait]
impl TaskWriter for AppState {
    async fn create_task(
        &self,
        draft: TaskDraft,
        assigned_to: UserId,
    ) -> Result<Task, StoreError> {
        let task = Task::new(draft, assigned_to);
        self.tasks.write().await.insert(task.id.clone(), task.clone());
        Ok(task)
    }
}

/// Run the full pipeline for one request.
///
/// Gates (payload present, extension, size) are checked before any parsing
/// or disk I/O happens.
pub async fn process_upload(
    state: &Arc<AppState>,
    payload: Option<UploadPayload>,
) -> Result<UploadOutcome, UploadError> {
    let payload = payload.ok_or(UploadError::NoFile)?;
    let format =
        UploadFormat::from_file_name(&payload.file_name).ok_or(UploadError::UnsupportedFormat)?;
    if payload.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }

    let mut spooled = NamedTempFile::new()?;
    spooled.write_all(&payload.bytes)?;

    let agents = state.find_agents().await;
    run_pipeline(state.as_ref(), &agents, spooled, format).await
}

/// Parse, validate, and distribute a spooled upload.
///
/// Takes ownership of the temp file; dropping it on every return path is
/// what guarantees cleanup.
pub(crate) async fn run_pipeline<W: TaskWriter>(
    writer: &W,
    agents: &[Agent],
    spooled: NamedTempFile,
    format: UploadFormat,
) -> Result<UploadOutcome, UploadError> {
    let rows = ingest::read_rows(spooled.path(), format)?;

    let total_rows = rows.len();
    let mut drafts = Vec::new();
    let mut invalid_rows = 0usize;
    for row in &rows {
        match validate_row(row) {
            Some(draft) => drafts.push(draft),
            None => invalid_rows += 1,
        }
    }

    if drafts.is_empty() {
        return Err(UploadError::NoValidTasks);
    }
    if agents.is_empty() {
        return Err(UploadError::NoAgents);
    }

    let total_tasks = drafts.len();
    let tasks = distribute(writer, drafts, agents).await?;
    let distribution = taskdist_core::distribution_summary(&tasks, agents);

    info!(
        total_rows,
        invalid_rows,
        total_tasks,
        agents = agents.len(),
        "Tasks uploaded and distributed"
    );

    Ok(UploadOutcome {
        summary: UploadSummary {
            total_tasks,
            total_rows,
            invalid_rows,
            distribution,
        },
        tasks,
    })
}

/// Assign drafts to agents with the round-robin plan and persist each one.
async fn distribute<W: TaskWriter>(
    writer: &W,
    drafts: Vec<TaskDraft>,
    agents: &[Agent],
) -> Result<Vec<Task>, UploadError> {
    let plan = DistributionPlan::new(drafts.len(), agents.len())
        .map_err(|_| UploadError::NoAgents)?;

    let mut tasks = Vec::with_capacity(drafts.len());
    for (position, draft) in drafts.into_iter().enumerate() {
        let agent = plan.agent_at(position, agents);
        // One awaited write at a time: creation order follows input order.
        let task = writer.create_task(draft, agent.id.clone()).await?;
        tasks.push(task);
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taskdist_core::TaskStatus;

    fn agents(n: usize) -> Vec<Agent> {
        (0..n)
            .map(|i| Agent::new(UserId::new(format!("agent-{i}")), format!("Agent {i}")))
            .collect()
    }

    fn spool_csv(content: &str) -> (NamedTempFile, PathBuf) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let path = file.path().to_path_buf();
        (file, path)
    }

    /// Writer that fails after a fixed number of successful inserts.
    struct FlakyWriter {
        fail_after: usize,
        written: AtomicUsize,
    }

    impl FlakyWriter {
        fn new(fail_after: usize) -> Self {
            Self {
                fail_after,
                written: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TaskWriter for FlakyWriter {
        async fn create_task(
            &self,
            draft: TaskDraft,
            assigned_to: UserId,
        ) -> Result<Task, StoreError> {
            if self.written.load(Ordering::SeqCst) >= self.fail_after {
                return Err(StoreError::TaskWrite("injected failure".to_string()));
            }
            self.written.fetch_add(1, Ordering::SeqCst);
            Ok(Task::new(draft, assigned_to))
        }
    }

    const VALID_CSV: &str = "FirstName,Phone,Notes\n\
        Alice,1111111111,first\n\
        Bob,2222222222,\n\
        Cara,3333333333,third\n";

    #[tokio::test]
    async fn test_successful_upload_end_to_end() {
        let state = AppState::new();
        {
            let pool = agents(2);
            let mut users = state.users.write().await;
            for (i, a) in pool.iter().enumerate() {
                users.insert(
                    a.id.clone(),
                    crate::state::User {
                        id: a.id.clone(),
                        name: a.name.clone(),
                        email: format!("a{i}@example.com"),
                        mobile_number: String::new(),
                        country_code: String::new(),
                        password_hash: String::new(),
                        role: crate::auth::Role::Agent,
                        created_at: chrono::Utc::now()
                            + chrono::Duration::milliseconds(i as i64),
                    },
                );
            }
        }

        let payload = UploadPayload {
            file_name: "contacts.csv".to_string(),
            bytes: VALID_CSV.as_bytes().to_vec(),
        };
        let outcome = process_upload(&state, Some(payload)).await.unwrap();

        assert_eq!(outcome.summary.total_rows, 3);
        assert_eq!(outcome.summary.total_tasks, 3);
        assert_eq!(outcome.summary.invalid_rows, 0);
        // n=3, k=2 -> per_agent=2: groups of 2 and 1.
        assert_eq!(outcome.summary.distribution[0].task_count, 2);
        assert_eq!(outcome.summary.distribution[1].task_count, 1);
        assert_eq!(state.task_count().await, 3);
        assert!(outcome.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[tokio::test]
    async fn test_no_file_rejected() {
        let state = AppState::new();
        assert!(matches!(
            process_upload(&state, None).await,
            Err(UploadError::NoFile)
        ));
    }

    #[tokio::test]
    async fn test_bad_extension_rejected_before_parsing() {
        let state = AppState::new();
        let payload = UploadPayload {
            file_name: "contacts.txt".to_string(),
            bytes: VALID_CSV.as_bytes().to_vec(),
        };
        assert!(matches!(
            process_upload(&state, Some(payload)).await,
            Err(UploadError::UnsupportedFormat)
        ));
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected_before_parsing() {
        let state = AppState::new();
        let payload = UploadPayload {
            file_name: "contacts.csv".to_string(),
            bytes: vec![b'x'; MAX_UPLOAD_BYTES + 1],
        };
        assert!(matches!(
            process_upload(&state, Some(payload)).await,
            Err(UploadError::TooLarge)
        ));
    }

    #[tokio::test]
    async fn test_zero_valid_rows_cleans_up_temp_file() {
        let (spooled, path) = spool_csv(
            "FirstName,Phone\nAlice,123-456-7890\nBob,notaphone\n",
        );
        let writer = FlakyWriter::new(usize::MAX);
        let result = run_pipeline(&writer, &agents(2), spooled, UploadFormat::Csv).await;

        assert!(matches!(result, Err(UploadError::NoValidTasks)));
        assert!(!path.exists(), "temp file must be gone after failure");
        assert_eq!(writer.written.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_agents_cleans_up_and_skips_distribution() {
        let (spooled, path) = spool_csv(VALID_CSV);
        let writer = FlakyWriter::new(usize::MAX);
        let result = run_pipeline(&writer, &[], spooled, UploadFormat::Csv).await;

        assert!(matches!(result, Err(UploadError::NoAgents)));
        assert!(!path.exists());
        assert_eq!(writer.written.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_parse_failure_cleans_up_temp_file() {
        let (spooled, path) = spool_csv("FirstName,Phone\nAlice,1111111111,extra,cols\n");
        let writer = FlakyWriter::new(usize::MAX);
        let result = run_pipeline(&writer, &agents(1), spooled, UploadFormat::Csv).await;

        assert!(matches!(result, Err(UploadError::Ingest(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_mid_batch_write_failure_keeps_prior_writes() {
        let (spooled, path) = spool_csv(VALID_CSV);
        let writer = FlakyWriter::new(2);
        let result = run_pipeline(&writer, &agents(3), spooled, UploadFormat::Csv).await;

        assert!(matches!(result, Err(UploadError::Store(_))));
        // The first two writes stay committed; no rollback.
        assert_eq!(writer.written.load(Ordering::SeqCst), 2);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_invalid_rows_counted_not_errored() {
        let (spooled, _path) = spool_csv(
            "FirstName,Phone,Notes\n\
             Alice,1111111111,ok\n\
             ,2222222222,missing name\n\
             Bob,33,short phone\n",
        );
        let writer = FlakyWriter::new(usize::MAX);
        let outcome = run_pipeline(&writer, &agents(1), spooled, UploadFormat::Csv)
            .await
            .unwrap();

        assert_eq!(outcome.summary.total_rows, 3);
        assert_eq!(outcome.summary.total_tasks, 1);
        assert_eq!(outcome.summary.invalid_rows, 2);
    }
}
