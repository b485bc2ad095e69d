//! Port interfaces for study subject/topic persistence.

use async_trait::async_trait;
use chronos_domain::{Result, StudySubject, StudyTopic};
use uuid::Uuid;

#[async_trait]
pub trait StudySubjectRepository: Send + Sync {
    async fn create(&self, subject: StudySubject) -> Result<()>;

    async fn update(&self, subject: StudySubject) -> Result<()>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<StudySubject>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StudySubject>>;
}

#[async_trait]
pub trait StudyTopicRepository: Send + Sync {
    async fn create(&self, topic: StudyTopic) -> Result<()>;

    async fn update(&self, topic: StudyTopic) -> Result<()>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn find_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<StudyTopic>>;

    async fn list_by_subject_and_user(
        &self,
        subject_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<StudyTopic>>;
}
