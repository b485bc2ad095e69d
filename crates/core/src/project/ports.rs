//! Port interface for project persistence.

use async_trait::async_trait;
use chronos_domain::{Project, Result};
use uuid::Uuid;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> Result<()>;

    async fn update(&self, project: Project) -> Result<()>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Project>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Project>>;
}
