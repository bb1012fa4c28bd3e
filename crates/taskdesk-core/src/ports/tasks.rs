use async_trait::async_trait;

use crate::domain::{NewTask, TaskPage, TaskPatch, TaskQuery};
use crate::error::ClientError;

/// Remote task endpoints. All calls are authenticated by the adapter.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch one filtered, sorted page.
    async fn list(&self, query: &TaskQuery) -> Result<TaskPage, ClientError>;

    async fn create(&self, task: &NewTask) -> Result<(), ClientError>;

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), ClientError>;

    /// Flip the task between PENDING and COMPLETED.
    async fn toggle(&self, id: &str) -> Result<(), ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}
