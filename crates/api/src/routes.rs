//! Route table.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{aiquiz, auth, goals, projects, quizzes, study, tasks, users};
use crate::state::AppState;

/// Assemble the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        // AI quiz generation
        .route("/ai-quiz", post(aiquiz::generate))
        // Users
        .route("/users/me", get(users::me))
        // Tasks
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route("/tasks/dashboard", get(tasks::dashboard))
        .route("/tasks/{id}", get(tasks::get).put(tasks::update).delete(tasks::delete))
        .route("/projects/{id}/tasks", get(tasks::list_by_project))
        .route("/study-topics/{id}/tasks", get(tasks::list_by_topic))
        // Projects
        .route("/projects", post(projects::create).get(projects::list))
        .route(
            "/projects/{id}",
            get(projects::get).put(projects::update).delete(projects::delete),
        )
        // Study subjects and topics
        .route("/study-subjects", post(study::create_subject).get(study::list_subjects))
        .route(
            "/study-subjects/{id}",
            get(study::get_subject).put(study::update_subject).delete(study::delete_subject),
        )
        .route("/study-subjects/{id}/topics", get(study::list_topics_by_subject))
        .route("/study-topics", post(study::create_topic))
        .route(
            "/study-topics/{id}",
            get(study::get_topic).put(study::update_topic).delete(study::delete_topic),
        )
        // Annual goals
        .route("/annual-goals", post(goals::create).get(goals::list))
        .route("/annual-goals/{id}", put(goals::update).delete(goals::delete))
        // Quizzes
        .route("/quizzes", post(quizzes::create).get(quizzes::list))
        .route("/quizzes/{id}", get(quizzes::get).delete(quizzes::delete))
        .route("/quizzes/{id}/questions", post(quizzes::add_question))
        .route("/quizzes/questions/{id}", delete(quizzes::remove_question))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
