//! Domain-wide constants.

/// Number of recently-created tasks returned in the dashboard payload.
pub const DASHBOARD_TASK_LIMIT: usize = 5;

/// Default number of questions generated per AI quiz request.
pub const DEFAULT_QUIZ_QUESTION_COUNT: u8 = 3;
