//! Task management and its calendar-sync orchestration.

pub mod ports;
pub mod service;
pub mod update;

pub use service::TaskService;
pub use update::{NewTask, TaskUpdate};
