//! Gemini integration for quiz question generation.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::GeminiError;
