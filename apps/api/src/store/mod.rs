//! Job-posting storage port and its backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::{JobPosting, JobPostingUpdate};
use crate::search::query::JobQuery;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Error enumeration for job-store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("posting not found")]
    NotFound,
    #[error("job store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt posting data: {0}")]
    Data(String),
}

/// Storage abstraction over the job-posting collection: filtered-and-sorted
/// find plus create/update/delete by id. Handlers only ever see this trait,
/// so search semantics can be exercised against an in-memory double.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, StoreError>;
    async fn create(&self, posting: JobPosting) -> Result<JobPosting, StoreError>;
    async fn update(&self, id: Uuid, update: JobPostingUpdate) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
