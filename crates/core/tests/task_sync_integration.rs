//! End-to-end behaviour of task mutations and their calendar side effects.
//!
//! Uses in-memory ports; the real `CalendarManager` sits between the task
//! service and the mock gateway so the full reconciliation path is covered.

mod support;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use chronos_core::{CalendarManager, NewTask, TaskService, TaskUpdate};
use chronos_domain::{ChronosError, TaskKind, TaskPriority, TaskStatus};
use support::calendar::{GatewayFailure, MockCalendarGateway};
use support::repositories::{
    InMemoryProjectRepository, InMemoryStudyTopicRepository, InMemoryTaskRepository,
};
use uuid::Uuid;

struct Fixture {
    service: TaskService,
    tasks: Arc<InMemoryTaskRepository>,
    gateway: Arc<MockCalendarGateway>,
    user_id: Uuid,
}

fn fixture_with_gateway(gateway: MockCalendarGateway) -> Fixture {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let gateway = Arc::new(gateway);
    let manager = Arc::new(CalendarManager::new(gateway.clone()));

    let service = TaskService::new(
        tasks.clone(),
        Arc::new(InMemoryProjectRepository::new()),
        Arc::new(InMemoryStudyTopicRepository::new()),
        manager,
    );

    Fixture { service, tasks, gateway, user_id: Uuid::new_v4() }
}

fn fixture() -> Fixture {
    fixture_with_gateway(MockCalendarGateway::new())
}

fn new_task(name: &str) -> NewTask {
    NewTask {
        name: name.into(),
        description: String::new(),
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        kind: TaskKind::Event,
        project_id: None,
        study_topic_id: None,
        start_date: None,
        due_date: None,
    }
}

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

#[tokio::test]
async fn create_with_start_date_mirrors_event_and_persists_id() {
    let fx = fixture();

    let mut input = new_task("Study Session");
    input.start_date = Some(at(1, 10));

    let task = fx.service.create_task(fx.user_id, input).await.unwrap();

    assert_eq!(task.external_event_id.as_deref(), Some("evt-generated"));

    // The storage row was written a second time with the event id attached.
    let stored = fx.tasks.stored(task.id).unwrap();
    assert_eq!(stored.external_event_id.as_deref(), Some("evt-generated"));

    // Mapper derived the end bound: start + 1h.
    let draft = fx.gateway.last_draft.lock().unwrap().clone().unwrap();
    assert_eq!(draft.summary, "Study Session");
    assert_eq!(draft.start, at(1, 10));
    assert_eq!(draft.end, at(1, 11));
}

#[tokio::test]
async fn create_without_dates_makes_no_provider_call() {
    let fx = fixture();

    let task = fx.service.create_task(fx.user_id, new_task("no dates")).await.unwrap();

    assert!(task.external_event_id.is_none());
    assert_eq!(fx.gateway.call_counts(), (0, 0, 0));
}

#[tokio::test]
async fn create_succeeds_when_credentials_are_missing() {
    let fx = fixture_with_gateway(MockCalendarGateway::failing_with(
        GatewayFailure::MissingCredentials,
    ));

    let mut input = new_task("no calendar account");
    input.start_date = Some(at(1, 9));

    let task = fx.service.create_task(fx.user_id, input).await.unwrap();

    assert!(task.external_event_id.is_none());
    let stored = fx.tasks.stored(task.id).unwrap();
    assert!(stored.external_event_id.is_none());
}

#[tokio::test]
async fn removing_due_date_deletes_the_mirrored_event() {
    let fx = fixture();

    // The due date is the task's only temporal field, so clearing it makes
    // the task unmirrorable.
    let mut only_due = new_task("only due");
    only_due.due_date = Some(at(3, 9));
    let task = fx.service.create_task(fx.user_id, only_due).await.unwrap();
    assert!(task.external_event_id.is_some());

    let update = TaskUpdate { remove_due_date: true, ..TaskUpdate::default() };
    let updated = fx.service.update_task(fx.user_id, task.id, update).await.unwrap();

    assert!(updated.external_event_id.is_none());
    assert_eq!(fx.gateway.call_counts(), (1, 0, 1));

    let stored = fx.tasks.stored(task.id).unwrap();
    assert!(stored.external_event_id.is_none());
    assert!(stored.due_date.is_none());
}

#[tokio::test]
async fn cleared_dates_persist_empty_id_even_when_delete_fails() {
    let fx = fixture();

    let mut input = new_task("flaky cleanup");
    input.due_date = Some(at(2, 9));
    let task = fx.service.create_task(fx.user_id, input).await.unwrap();

    fx.gateway.set_failure(GatewayFailure::Provider);
    let update = TaskUpdate { remove_due_date: true, ..TaskUpdate::default() };
    let updated = fx.service.update_task(fx.user_id, task.id, update).await.unwrap();

    // Delete failure is swallowed; the task still drops its event id.
    assert!(updated.external_event_id.is_none());
    assert!(fx.tasks.stored(task.id).unwrap().external_event_id.is_none());
}

#[tokio::test]
async fn metadata_update_never_touches_the_provider() {
    let fx = fixture();

    let mut input = new_task("metadata only");
    input.start_date = Some(at(1, 9));
    let task = fx.service.create_task(fx.user_id, input).await.unwrap();
    let counts_after_create = fx.gateway.call_counts();

    let update = TaskUpdate {
        status: Some(TaskStatus::Done),
        priority: Some(TaskPriority::High),
        done_at: Some(at(1, 18)),
        ..TaskUpdate::default()
    };
    fx.service.update_task(fx.user_id, task.id, update).await.unwrap();

    assert_eq!(fx.gateway.call_counts(), counts_after_create);
}

#[tokio::test]
async fn date_change_updates_existing_event_in_place() {
    let fx = fixture();

    let mut input = new_task("reschedule me");
    input.start_date = Some(at(1, 9));
    let task = fx.service.create_task(fx.user_id, input).await.unwrap();

    let update = TaskUpdate { start_date: Some(at(5, 14)), ..TaskUpdate::default() };
    let updated = fx.service.update_task(fx.user_id, task.id, update).await.unwrap();

    // The id survives an in-place update; exactly one update call was made.
    assert_eq!(updated.external_event_id.as_deref(), Some("evt-generated"));
    assert_eq!(fx.gateway.call_counts(), (1, 1, 0));
}

#[tokio::test]
async fn failed_update_keeps_the_stale_event_id() {
    let fx = fixture();

    let mut input = new_task("update will fail");
    input.start_date = Some(at(1, 9));
    let task = fx.service.create_task(fx.user_id, input).await.unwrap();

    fx.gateway.set_failure(GatewayFailure::Provider);
    let update = TaskUpdate { start_date: Some(at(6, 8)), ..TaskUpdate::default() };
    let updated = fx.service.update_task(fx.user_id, task.id, update).await.unwrap();

    // The overall update still succeeds and the stale id is retained.
    assert_eq!(updated.external_event_id.as_deref(), Some("evt-generated"));
    assert_eq!(fx.tasks.stored(task.id).unwrap().external_event_id.as_deref(), Some("evt-generated"));
}

#[tokio::test]
async fn failed_insert_self_heals_on_next_date_update() {
    let fx = fixture_with_gateway(MockCalendarGateway::failing_with(GatewayFailure::Provider));

    let mut input = new_task("mirror missing");
    input.start_date = Some(at(1, 9));
    let task = fx.service.create_task(fx.user_id, input).await.unwrap();
    assert!(task.external_event_id.is_none());

    // Provider recovers; the next date-touching update notices the missing
    // mirror and inserts instead of updating.
    fx.gateway.set_failure(GatewayFailure::None);
    let update = TaskUpdate { start_date: Some(at(2, 9)), ..TaskUpdate::default() };
    let updated = fx.service.update_task(fx.user_id, task.id, update).await.unwrap();

    assert_eq!(updated.external_event_id.as_deref(), Some("evt-generated"));
    assert_eq!(fx.gateway.call_counts().1, 0);
    assert_eq!(fx.gateway.call_counts().0, 2);
}

#[tokio::test]
async fn delete_with_no_event_id_makes_no_provider_call() {
    let fx = fixture();

    let task = fx.service.create_task(fx.user_id, new_task("plain")).await.unwrap();
    fx.service.delete_task(fx.user_id, task.id).await.unwrap();

    assert_eq!(fx.gateway.call_counts(), (0, 0, 0));
    assert!(fx.tasks.stored(task.id).is_none());
}

#[tokio::test]
async fn delete_succeeds_even_when_calendar_cleanup_fails() {
    let fx = fixture();

    let mut input = new_task("cleanup fails");
    input.start_date = Some(at(1, 9));
    let task = fx.service.create_task(fx.user_id, input).await.unwrap();

    fx.gateway.set_failure(GatewayFailure::Provider);
    fx.service.delete_task(fx.user_id, task.id).await.unwrap();

    assert!(fx.tasks.stored(task.id).is_none());
    assert_eq!(fx.gateway.call_counts().2, 1);
}

#[tokio::test]
async fn project_kind_requires_a_project_reference() {
    let fx = fixture();

    let mut input = new_task("project task");
    input.kind = TaskKind::Project;

    let err = fx.service.create_task(fx.user_id, input).await.unwrap_err();
    assert!(matches!(err, ChronosError::ProjectRequired));
}

#[tokio::test]
async fn unknown_project_reference_is_rejected_before_persist() {
    let fx = fixture();

    let mut input = new_task("dangling project");
    input.kind = TaskKind::Project;
    input.project_id = Some(Uuid::new_v4());

    let err = fx.service.create_task(fx.user_id, input).await.unwrap_err();
    assert!(matches!(err, ChronosError::ProjectNotFound));
}

#[tokio::test]
async fn foreign_task_is_indistinguishable_from_missing() {
    let fx = fixture();

    let task = fx.service.create_task(fx.user_id, new_task("mine")).await.unwrap();

    let other_user = Uuid::new_v4();
    let err = fx.service.find_by_id(other_user, task.id).await.unwrap_err();
    assert!(matches!(err, ChronosError::NotFound(_)));
}
