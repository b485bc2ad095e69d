//! Annual goal CRUD service.
//!
//! Goal lookups are by id with a separate ownership check, so the
//! repository stays owner-agnostic; callers still observe a single
//! not-found/unauthorized outcome.

use std::sync::Arc;

use chrono::Utc;
use chronos_domain::{AnnualGoal, AnnualGoalStatus, ChronosError, Result};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ports::AnnualGoalRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnualGoal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub year: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnualGoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub status: Option<AnnualGoalStatus>,
}

pub struct GoalService {
    repo: Arc<dyn AnnualGoalRepository>,
}

impl GoalService {
    pub fn new(repo: Arc<dyn AnnualGoalRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user_id: Uuid, new: NewAnnualGoal) -> Result<AnnualGoal> {
        let now = Utc::now();
        let goal = AnnualGoal {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            description: new.description,
            year: new.year,
            status: AnnualGoalStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(goal.clone()).await?;
        info!(goal_id = %goal.id, "annual goal created");
        Ok(goal)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<AnnualGoal>> {
        self.repo.list_by_user(user_id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: AnnualGoalUpdate,
    ) -> Result<AnnualGoal> {
        let mut goal = self.find_owned(user_id, id).await?;

        if let Some(title) = update.title {
            goal.title = title;
        }
        if let Some(description) = update.description {
            goal.description = description;
        }
        if let Some(year) = update.year {
            goal.year = year;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        goal.updated_at = Utc::now();

        self.repo.update(goal.clone()).await?;
        Ok(goal)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.find_owned(user_id, id).await?;
        self.repo.delete(id).await?;
        info!(goal_id = %id, "annual goal deleted");
        Ok(())
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<AnnualGoal> {
        let goal = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ChronosError::NotFound(format!("annual goal {id}")))?;

        if goal.user_id != user_id {
            // Same outcome as "does not exist": no ownership leak.
            return Err(ChronosError::NotFound(format!("annual goal {id}")));
        }

        Ok(goal)
    }
}
