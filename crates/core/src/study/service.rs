//! Study subject/topic CRUD service.

use std::sync::Arc;

use chrono::Utc;
use chronos_domain::{ChronosError, Result, StudySubject, StudyTopic};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ports::{StudySubjectRepository, StudyTopicRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudySubject {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudyTopic {
    pub subject_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct StudyService {
    subjects: Arc<dyn StudySubjectRepository>,
    topics: Arc<dyn StudyTopicRepository>,
}

impl StudyService {
    pub fn new(
        subjects: Arc<dyn StudySubjectRepository>,
        topics: Arc<dyn StudyTopicRepository>,
    ) -> Self {
        Self { subjects, topics }
    }

    pub async fn create_subject(&self, user_id: Uuid, new: NewStudySubject) -> Result<StudySubject> {
        let now = Utc::now();
        let subject = StudySubject {
            id: Uuid::new_v4(),
            user_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };

        self.subjects.create(subject.clone()).await?;
        info!(subject_id = %subject.id, "study subject created");
        Ok(subject)
    }

    pub async fn get_subject(&self, user_id: Uuid, id: Uuid) -> Result<StudySubject> {
        self.subjects
            .find_by_id_and_user(id, user_id)
            .await?
            .ok_or_else(|| ChronosError::NotFound(format!("study subject {id}")))
    }

    pub async fn list_subjects(&self, user_id: Uuid) -> Result<Vec<StudySubject>> {
        self.subjects.list_by_user(user_id).await
    }

    pub async fn update_subject(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: StudyItemUpdate,
    ) -> Result<StudySubject> {
        let mut subject = self.get_subject(user_id, id).await?;

        if let Some(name) = update.name {
            subject.name = name;
        }
        if let Some(description) = update.description {
            subject.description = description;
        }
        subject.updated_at = Utc::now();

        self.subjects.update(subject.clone()).await?;
        Ok(subject)
    }

    pub async fn delete_subject(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if !self.subjects.delete(id, user_id).await? {
            return Err(ChronosError::NotFound(format!("study subject {id}")));
        }
        Ok(())
    }

    pub async fn create_topic(&self, user_id: Uuid, new: NewStudyTopic) -> Result<StudyTopic> {
        // The parent subject must exist for this owner.
        self.get_subject(user_id, new.subject_id).await?;

        let now = Utc::now();
        let topic = StudyTopic {
            id: Uuid::new_v4(),
            user_id,
            subject_id: new.subject_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };

        self.topics.create(topic.clone()).await?;
        info!(topic_id = %topic.id, "study topic created");
        Ok(topic)
    }

    pub async fn get_topic(&self, user_id: Uuid, id: Uuid) -> Result<StudyTopic> {
        self.topics
            .find_by_id_and_user(id, user_id)
            .await?
            .ok_or(ChronosError::StudyTopicNotFound)
    }

    pub async fn list_topics_by_subject(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<StudyTopic>> {
        self.get_subject(user_id, subject_id).await?;
        self.topics.list_by_subject_and_user(subject_id, user_id).await
    }

    pub async fn update_topic(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: StudyItemUpdate,
    ) -> Result<StudyTopic> {
        let mut topic = self.get_topic(user_id, id).await?;

        if let Some(name) = update.name {
            topic.name = name;
        }
        if let Some(description) = update.description {
            topic.description = description;
        }
        topic.updated_at = Utc::now();

        self.topics.update(topic.clone()).await?;
        Ok(topic)
    }

    pub async fn delete_topic(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if !self.topics.delete(id, user_id).await? {
            return Err(ChronosError::StudyTopicNotFound);
        }
        Ok(())
    }
}
