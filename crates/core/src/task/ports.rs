//! Port interface for task persistence.

use async_trait::async_trait;
use chronos_domain::{Result, Task};
use uuid::Uuid;

/// Trait for persisting tasks.
///
/// Lookup and delete operations are always owner-scoped: a task that exists
/// but belongs to someone else is indistinguishable from one that does not
/// exist.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: Task) -> Result<()>;

    async fn update(&self, task: Task) -> Result<()>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>>;

    async fn list_by_project_and_user(&self, project_id: Uuid, user_id: Uuid) -> Result<Vec<Task>>;

    async fn list_by_topic_and_user(&self, topic_id: Uuid, user_id: Uuid) -> Result<Vec<Task>>;
}
