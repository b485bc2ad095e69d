//! Pure mapping from a task snapshot to a calendar event draft.

use chrono::Duration;
use chronos_domain::{CalendarTask, EventDraft};

/// Build the event representation for a task, or `None` when the task has
/// no temporal fields and therefore nothing representable.
///
/// Bounds are derived from partial date information:
/// - start only: the event lasts one hour from the start;
/// - due only: the event starts one hour before the deadline;
/// - both: used verbatim, the caller is trusted not to invert them.
pub fn build_event(task: &CalendarTask) -> Option<EventDraft> {
    let (start, end) = match (task.start_date, task.due_date) {
        (None, None) => return None,
        (Some(start), None) => (start, start + Duration::hours(1)),
        (None, Some(due)) => (due - Duration::hours(1), due),
        (Some(start), Some(due)) => (start, due),
    };

    Some(EventDraft {
        summary: task.name.clone(),
        description: task.description.clone(),
        start,
        end,
    })
}
