//! In-memory repository mocks.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use chronos_core::{ProjectRepository, StudyTopicRepository, TaskRepository};
use chronos_domain::{Project, ProjectStatus, Result, StudyTopic, Task};
use uuid::Uuid;

/// Task store backed by a `Mutex<Vec<Task>>`.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored row for assertions.
    pub fn stored(&self, id: Uuid) -> Option<Task> {
        self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> Result<()> {
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }

    async fn update(&self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(slot) = tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(tasks.len() < before)
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>> {
        Ok(self.tasks.lock().unwrap().iter().filter(|t| t.user_id == user_id).cloned().collect())
    }

    async fn list_by_project_and_user(&self, project_id: Uuid, user_id: Uuid) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.project_id == Some(project_id) && t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_topic_and_user(&self, topic_id: Uuid, user_id: Uuid) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.study_topic_id == Some(topic_id) && t.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Project store seeded up front.
#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<Vec<Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        self.projects.lock().unwrap().push(Project {
            id,
            user_id,
            name: "seeded project".into(),
            description: String::new(),
            status: ProjectStatus::InProgress,
            created_at: now,
            updated_at: now,
        });
        self
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: Project) -> Result<()> {
        self.projects.lock().unwrap().push(project);
        Ok(())
    }

    async fn update(&self, project: Project) -> Result<()> {
        let mut projects = self.projects.lock().unwrap();
        if let Some(slot) = projects.iter_mut().find(|p| p.id == project.id) {
            *slot = project;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok(projects.len() < before)
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Study topic store seeded up front.
#[derive(Default)]
pub struct InMemoryStudyTopicRepository {
    topics: Mutex<Vec<StudyTopic>>,
}

impl InMemoryStudyTopicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic(self, id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        self.topics.lock().unwrap().push(StudyTopic {
            id,
            user_id,
            subject_id: Uuid::new_v4(),
            name: "seeded topic".into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        });
        self
    }
}

#[async_trait]
impl StudyTopicRepository for InMemoryStudyTopicRepository {
    async fn create(&self, topic: StudyTopic) -> Result<()> {
        self.topics.lock().unwrap().push(topic);
        Ok(())
    }

    async fn update(&self, topic: StudyTopic) -> Result<()> {
        let mut topics = self.topics.lock().unwrap();
        if let Some(slot) = topics.iter_mut().find(|t| t.id == topic.id) {
            *slot = topic;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut topics = self.topics.lock().unwrap();
        let before = topics.len();
        topics.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(topics.len() < before)
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<StudyTopic>> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list_by_subject_and_user(
        &self,
        subject_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<StudyTopic>> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.subject_id == subject_id && t.user_id == user_id)
            .cloned()
            .collect())
    }
}
