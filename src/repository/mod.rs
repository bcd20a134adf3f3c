mod conversion;
mod submission_repository;

use async_trait::async_trait;

use crate::models::{NewSubmission, Submission, SubmissionId, Token};

pub use submission_repository::SubmissionRepository;

/// Storage of submissions. Records are only ever inserted and read.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: &NewSubmission) -> Result<SubmissionId, anyhow::Error>;

    async fn find_by_token(&self, token: &Token) -> Result<Option<Submission>, anyhow::Error>;

    /// Ties on `created_at` are ordered by descending id.
    async fn list_all_by_created_at_desc(&self) -> Result<Vec<Submission>, anyhow::Error>;
}
