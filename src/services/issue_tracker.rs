use async_trait::async_trait;

use crate::domain::ticket::{CreateIssueBody, CreatedIssue};
use crate::error::AppResult;

/// The external issue tracker. One call, no internal retry; errors carry the
/// tracker's response detail for logging.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_issue(&self, body: &CreateIssueBody) -> AppResult<CreatedIssue>;
}
