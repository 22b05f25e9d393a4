// Background processing jobs keyed by caller-supplied ids
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::document_processor::{DocumentProcessor, ProcessingResult};
use crate::pdf_extraction::SourceDocument;
use crate::types::{DonorscanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub status: JobStatus,
    pub filename: String,
    pub filesize: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, JobRecord>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the job as processing and run the pipeline on the blocking pool.
    ///
    /// A missing file is reported here, before any job is recorded.
    pub async fn submit(
        &self,
        id: impl Into<String>,
        path: PathBuf,
        ocr_enabled: bool,
        processor: Arc<DocumentProcessor>,
    ) -> Result<JoinHandle<()>> {
        let id = id.into();
        let source = SourceDocument::from_path(&path)?;

        let record = JobRecord {
            id: id.clone(),
            status: JobStatus::Processing,
            filename: source.filename().to_string(),
            filesize: source.filesize(),
            timestamp: Utc::now(),
            result: None,
            error: None,
        };
        self.jobs.write().await.insert(id.clone(), record);
        log::info!("Job {} queued for {}", id, path.display());

        let jobs = Arc::clone(&self.jobs);
        Ok(tokio::spawn(async move {
            let outcome =
                tokio::task::spawn_blocking(move || processor.process(&source, ocr_enabled)).await;

            let mut jobs = jobs.write().await;
            let Some(job) = jobs.get_mut(&id) else {
                log::debug!("Job {} was removed before it finished", id);
                return;
            };
            match outcome {
                Ok(Ok(result)) => {
                    job.status = JobStatus::Completed;
                    job.result = Some(result);
                    log::info!("Job {} completed", id);
                }
                Ok(Err(err)) => {
                    job.status = JobStatus::Error;
                    job.error = Some(err.to_string());
                    log::warn!("Job {} failed: {}", id, err);
                }
                Err(join_err) => {
                    job.status = JobStatus::Error;
                    job.error = Some(format!("processing task aborted: {join_err}"));
                    log::warn!("Job {} aborted: {}", id, join_err);
                }
            }
        }))
    }

    pub async fn get(&self, id: &str) -> Result<JobRecord> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DonorscanError::JobNotFound(id.to_string()))
    }

    pub async fn status(&self, id: &str) -> Result<JobStatus> {
        Ok(self.get(id).await?.status)
    }

    /// `None` until the job has completed.
    pub async fn result(&self, id: &str) -> Result<Option<ProcessingResult>> {
        Ok(self.get(id).await?.result)
    }

    pub async fn remove(&self, id: &str) -> Result<JobRecord> {
        self.jobs
            .write()
            .await
            .remove(id)
            .ok_or_else(|| DonorscanError::JobNotFound(id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}
