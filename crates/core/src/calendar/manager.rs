//! Reconciliation between a task's persisted state and its mirrored event.

use std::sync::Arc;

use chronos_domain::CalendarTask;
use tracing::{info, warn};
use uuid::Uuid;

use super::mapper::build_event;
use super::ports::{CalendarError, CalendarGateway};

/// Result of one reconciliation pass.
///
/// Both channels are populated independently, mirroring the contract of
/// [`CalendarManager::sync_task`]: a failed update still reports the prior
/// event id so the caller can decide whether to retry, while a failed
/// cleanup delete reports an empty id and no error at all.
#[derive(Debug)]
pub struct SyncOutcome {
    /// The event id the task should carry from now on. Empty when no
    /// mirrored event exists (or should exist) for the task.
    pub event_id: String,
    /// Failure of the insert/update path, if any. Cleanup failures on the
    /// delete-on-invalid path are logged and never surface here.
    pub error: Option<CalendarError>,
}

impl SyncOutcome {
    fn ok(event_id: impl Into<String>) -> Self {
        Self { event_id: event_id.into(), error: None }
    }

    fn failed(event_id: impl Into<String>, error: CalendarError) -> Self {
        Self { event_id: event_id.into(), error: Some(error) }
    }
}

/// Decides whether a task's mirrored calendar event must be created,
/// updated or deleted, and performs the chosen action via the gateway.
pub struct CalendarManager {
    gateway: Arc<dyn CalendarGateway>,
}

impl CalendarManager {
    pub fn new(gateway: Arc<dyn CalendarGateway>) -> Self {
        Self { gateway }
    }

    /// Reconcile the mirrored event with the task's current dates.
    ///
    /// The action is driven by two observed facts: whether the task holds a
    /// mirrored event id, and whether it still has at least one temporal
    /// field. Deleting a no-longer-mirrorable event is best-effort cleanup;
    /// its failure is logged and swallowed because the task is correct
    /// without the mirror. Insert and update failures are returned.
    pub async fn sync_task(&self, user_id: Uuid, task: &CalendarTask) -> SyncOutcome {
        let event_id = task.event_id();

        let Some(draft) = build_event(task) else {
            if let Some(existing) = event_id {
                info!(task_id = %task.id, "task no longer has valid dates, deleting calendar event");
                if let Err(err) = self.gateway.delete(user_id, existing).await {
                    warn!(task_id = %task.id, error = %err, "failed to delete calendar event");
                }
            }
            return SyncOutcome::ok("");
        };

        if let Some(existing) = event_id {
            return match self.gateway.update(user_id, existing, &draft).await {
                Ok(()) => SyncOutcome::ok(existing),
                Err(err) => {
                    warn!(task_id = %task.id, error = %err, "failed to update calendar event");
                    SyncOutcome::failed(existing, err)
                }
            };
        }

        match self.gateway.insert(user_id, &draft).await {
            Ok(new_id) if new_id.is_empty() => {
                warn!(task_id = %task.id, "calendar provider returned empty event id");
                SyncOutcome::ok("")
            }
            Ok(new_id) => {
                info!(task_id = %task.id, event_id = %new_id, "created calendar event");
                SyncOutcome::ok(new_id)
            }
            Err(err) => {
                warn!(task_id = %task.id, error = %err, "failed to create calendar event");
                SyncOutcome::failed("", err)
            }
        }
    }

    /// Delete the mirrored event for a task being removed.
    ///
    /// An empty `event_id` is a no-op. Failures are logged and returned;
    /// the task-deletion caller treats them as best-effort.
    pub async fn remove_task(&self, user_id: Uuid, event_id: &str) -> Result<(), CalendarError> {
        if event_id.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.gateway.delete(user_id, event_id).await {
            warn!(event_id, error = %err, "failed to delete calendar event");
            return Err(err);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use chronos_domain::EventDraft;

    use super::*;

    /// Counts calls per operation and fails the configured ones.
    #[derive(Default)]
    struct RecordingGateway {
        inserts: Mutex<u32>,
        updates: Mutex<u32>,
        deletes: Mutex<u32>,
        insert_result: Mutex<Option<Result<String, CalendarError>>>,
        fail_update: bool,
        fail_delete: bool,
    }

    impl RecordingGateway {
        fn with_insert_result(result: Result<String, CalendarError>) -> Self {
            Self { insert_result: Mutex::new(Some(result)), ..Self::default() }
        }

        fn counts(&self) -> (u32, u32, u32) {
            (
                *self.inserts.lock().unwrap(),
                *self.updates.lock().unwrap(),
                *self.deletes.lock().unwrap(),
            )
        }
    }

    #[async_trait]
    impl CalendarGateway for RecordingGateway {
        async fn insert(&self, _user_id: Uuid, _event: &EventDraft) -> Result<String, CalendarError> {
            *self.inserts.lock().unwrap() += 1;
            self.insert_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok("evt-new".to_string()))
        }

        async fn update(
            &self,
            _user_id: Uuid,
            _event_id: &str,
            _event: &EventDraft,
        ) -> Result<(), CalendarError> {
            *self.updates.lock().unwrap() += 1;
            if self.fail_update {
                Err(CalendarError::Provider("boom".into()))
            } else {
                Ok(())
            }
        }

        async fn delete(&self, _user_id: Uuid, _event_id: &str) -> Result<(), CalendarError> {
            *self.deletes.lock().unwrap() += 1;
            if self.fail_delete {
                Err(CalendarError::Provider("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    fn task(start: bool, due: bool, event_id: Option<&str>) -> CalendarTask {
        CalendarTask {
            id: Uuid::new_v4(),
            name: "task".into(),
            description: String::new(),
            start_date: start.then(|| Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
            due_date: due.then(|| Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()),
            external_event_id: event_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn no_dates_no_event_id_is_a_noop() {
        let gateway = Arc::new(RecordingGateway::default());
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(false, false, None)).await;

        assert_eq!(outcome.event_id, "");
        assert!(outcome.error.is_none());
        assert_eq!(gateway.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn valid_dates_without_event_id_inserts() {
        let gateway = Arc::new(RecordingGateway::default());
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(true, true, None)).await;

        assert_eq!(outcome.event_id, "evt-new");
        assert!(outcome.error.is_none());
        assert_eq!(gateway.counts(), (1, 0, 0));
    }

    #[tokio::test]
    async fn insert_failure_is_returned_with_empty_id() {
        let gateway = Arc::new(RecordingGateway::with_insert_result(Err(
            CalendarError::MissingCredentials,
        )));
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(true, false, None)).await;

        assert_eq!(outcome.event_id, "");
        assert!(matches!(outcome.error, Some(CalendarError::MissingCredentials)));
    }

    #[tokio::test]
    async fn empty_insert_id_is_not_an_error() {
        let gateway = Arc::new(RecordingGateway::with_insert_result(Ok(String::new())));
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(true, false, None)).await;

        assert_eq!(outcome.event_id, "");
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn dates_cleared_with_event_id_deletes_once() {
        let gateway = Arc::new(RecordingGateway::default());
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(false, false, Some("evt-1"))).await;

        assert_eq!(outcome.event_id, "");
        assert!(outcome.error.is_none());
        assert_eq!(gateway.counts(), (0, 0, 1));
    }

    #[tokio::test]
    async fn delete_failure_on_invalid_dates_is_swallowed() {
        let gateway =
            Arc::new(RecordingGateway { fail_delete: true, ..RecordingGateway::default() });
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(false, false, Some("evt-1"))).await;

        assert_eq!(outcome.event_id, "");
        assert!(outcome.error.is_none());
        assert_eq!(gateway.counts(), (0, 0, 1));
    }

    #[tokio::test]
    async fn existing_event_with_valid_dates_updates() {
        let gateway = Arc::new(RecordingGateway::default());
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(true, true, Some("evt-1"))).await;

        assert_eq!(outcome.event_id, "evt-1");
        assert!(outcome.error.is_none());
        assert_eq!(gateway.counts(), (0, 1, 0));
    }

    #[tokio::test]
    async fn update_failure_keeps_stale_id_and_reports_error() {
        let gateway =
            Arc::new(RecordingGateway { fail_update: true, ..RecordingGateway::default() });
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(true, true, Some("evt-1"))).await;

        assert_eq!(outcome.event_id, "evt-1");
        assert!(outcome.error.is_some());
        assert_eq!(gateway.counts(), (0, 1, 0));
    }

    #[tokio::test]
    async fn blank_event_id_field_is_treated_as_absent() {
        let gateway = Arc::new(RecordingGateway::default());
        let manager = CalendarManager::new(gateway.clone());

        let outcome = manager.sync_task(Uuid::new_v4(), &task(true, false, Some(""))).await;

        // An empty stored id must lead to an insert, not an update.
        assert_eq!(outcome.event_id, "evt-new");
        assert_eq!(gateway.counts(), (1, 0, 0));
    }

    #[tokio::test]
    async fn remove_task_with_empty_id_makes_no_calls() {
        let gateway = Arc::new(RecordingGateway::default());
        let manager = CalendarManager::new(gateway.clone());

        manager.remove_task(Uuid::new_v4(), "").await.unwrap();

        assert_eq!(gateway.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn remove_task_returns_delete_failures() {
        let gateway =
            Arc::new(RecordingGateway { fail_delete: true, ..RecordingGateway::default() });
        let manager = CalendarManager::new(gateway.clone());

        let result = manager.remove_task(Uuid::new_v4(), "evt-1").await;

        assert!(result.is_err());
        assert_eq!(gateway.counts(), (0, 0, 1));
    }
}
