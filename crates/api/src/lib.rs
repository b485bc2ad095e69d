//! # Chronos API
//!
//! HTTP transport layer: routing, authentication extraction, DTO
//! marshalling and error mapping. Thin wrappers around the core services.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
