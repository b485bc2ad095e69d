//! Quiz storage and AI question generation.

pub mod generator;
pub mod ports;
pub mod service;

pub use generator::{AiQuizService, QuestionGenerator, QuestionRequest};
pub use service::QuizService;
