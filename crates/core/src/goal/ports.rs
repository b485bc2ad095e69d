//! Port interface for annual goal persistence.

use async_trait::async_trait;
use chronos_domain::{AnnualGoal, Result};
use uuid::Uuid;

#[async_trait]
pub trait AnnualGoalRepository: Send + Sync {
    async fn create(&self, goal: AnnualGoal) -> Result<()>;

    async fn update(&self, goal: AnnualGoal) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnualGoal>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AnnualGoal>>;
}
