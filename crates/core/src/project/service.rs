//! Project CRUD service.

use std::sync::Arc;

use chrono::Utc;
use chronos_domain::{ChronosError, Project, ProjectStatus, Result};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ports::ProjectRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user_id: Uuid, new: NewProject) -> Result<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id,
            name: new.name,
            description: new.description,
            status: new.status,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(project.clone()).await?;
        info!(project_id = %project.id, "project created");
        Ok(project)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Project> {
        self.repo
            .find_by_id_and_user(id, user_id)
            .await?
            .ok_or(ChronosError::ProjectNotFound)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Project>> {
        self.repo.list_by_user(user_id).await
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        let mut project = self.get(user_id, id).await?;

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        project.updated_at = Utc::now();

        self.repo.update(project.clone()).await?;
        Ok(project)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if !self.repo.delete(id, user_id).await? {
            return Err(ChronosError::ProjectNotFound);
        }
        info!(project_id = %id, "project deleted");
        Ok(())
    }
}
