//! In-memory calendar gateway mock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chronos_core::{CalendarError, CalendarGateway};
use chronos_domain::EventDraft;
use uuid::Uuid;

/// Failure mode injected into [`MockCalendarGateway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayFailure {
    #[default]
    None,
    /// Credential resolution fails before any provider call would be made.
    MissingCredentials,
    /// Provider rejects the operation.
    Provider,
}

/// Counting mock for the `CalendarGateway` port.
#[derive(Default)]
pub struct MockCalendarGateway {
    pub inserts: AtomicU32,
    pub updates: AtomicU32,
    pub deletes: AtomicU32,
    pub failure: Mutex<GatewayFailure>,
    pub next_insert_id: Mutex<String>,
    pub last_draft: Mutex<Option<EventDraft>>,
}

impl MockCalendarGateway {
    pub fn new() -> Self {
        let gateway = Self::default();
        *gateway.next_insert_id.lock().unwrap() = "evt-generated".to_string();
        gateway
    }

    pub fn failing_with(failure: GatewayFailure) -> Self {
        let gateway = Self::new();
        *gateway.failure.lock().unwrap() = failure;
        gateway
    }

    pub fn set_failure(&self, failure: GatewayFailure) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn call_counts(&self) -> (u32, u32, u32) {
        (
            self.inserts.load(Ordering::SeqCst),
            self.updates.load(Ordering::SeqCst),
            self.deletes.load(Ordering::SeqCst),
        )
    }

    fn active_failure(&self) -> Option<CalendarError> {
        match *self.failure.lock().unwrap() {
            GatewayFailure::None => None,
            GatewayFailure::MissingCredentials => Some(CalendarError::MissingCredentials),
            GatewayFailure::Provider => Some(CalendarError::Provider("provider failure".into())),
        }
    }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    async fn insert(&self, _user_id: Uuid, event: &EventDraft) -> Result<String, CalendarError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.active_failure() {
            return Err(err);
        }
        *self.last_draft.lock().unwrap() = Some(event.clone());
        Ok(self.next_insert_id.lock().unwrap().clone())
    }

    async fn update(
        &self,
        _user_id: Uuid,
        _event_id: &str,
        event: &EventDraft,
    ) -> Result<(), CalendarError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.active_failure() {
            return Err(err);
        }
        *self.last_draft.lock().unwrap() = Some(event.clone());
        Ok(())
    }

    async fn delete(&self, _user_id: Uuid, _event_id: &str) -> Result<(), CalendarError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.active_failure() {
            return Err(err);
        }
        Ok(())
    }
}
