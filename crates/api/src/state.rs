//! Application state: services and shared infrastructure wired once at
//! startup. All configuration is passed in explicitly; there are no
//! globals.

use std::sync::Arc;

use chronos_common::auth::TokenSigner;
use chronos_common::crypto::EncryptionService;
use chronos_core::{
    AiQuizService, CalendarManager, GoalService, ProjectService, QuizService, StudyService,
    TaskService, UserService,
};
use chronos_domain::{ChronosError, Result};
use chronos_infra::config::Config;
use chronos_infra::database::{
    DbManager, SqliteAnnualGoalRepository, SqliteProjectRepository, SqliteQuizRepository,
    SqliteStudySubjectRepository, SqliteStudyTopicRepository, SqliteTaskRepository,
    SqliteUserRepository,
};
use chronos_infra::integrations::gemini::GeminiClient;
use chronos_infra::integrations::google_calendar::{
    CredentialResolver, GoogleCalendarClient, GoogleOAuthSettings,
};
use chronos_infra::HttpClient;

/// Google OAuth parameters used by the login flow.
#[derive(Debug, Clone)]
pub struct GoogleLoginSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
}

/// Shared application state.
pub struct AppState {
    pub tasks: TaskService,
    pub projects: ProjectService,
    pub study: StudyService,
    pub goals: GoalService,
    pub quizzes: QuizService,
    pub ai_quiz: AiQuizService,
    pub users: UserService,
    pub signer: TokenSigner,
    pub session_ttl_seconds: i64,
    pub crypto: Arc<EncryptionService>,
    pub http: HttpClient,
    pub google_login: GoogleLoginSettings,
}

impl AppState {
    /// Build the full application from configuration.
    pub fn from_config(config: &Config) -> Result<Arc<Self>> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let crypto = Arc::new(
            EncryptionService::new(config.security.crypto_key.as_bytes())
                .map_err(|e| ChronosError::Config(e.to_string()))?,
        );
        let signer = TokenSigner::new(config.security.session_secret.as_bytes())
            .map_err(|e| ChronosError::Config(e.to_string()))?;
        let http = HttpClient::new()?;

        let task_repo = Arc::new(SqliteTaskRepository::new(db.clone()));
        let project_repo = Arc::new(SqliteProjectRepository::new(db.clone()));
        let subject_repo = Arc::new(SqliteStudySubjectRepository::new(db.clone()));
        let topic_repo = Arc::new(SqliteStudyTopicRepository::new(db.clone()));
        let goal_repo = Arc::new(SqliteAnnualGoalRepository::new(db.clone()));
        let quiz_repo = Arc::new(SqliteQuizRepository::new(db.clone()));
        let user_repo = Arc::new(SqliteUserRepository::new(db.clone()));

        let resolver = CredentialResolver::new(
            user_repo.clone(),
            crypto.clone(),
            http.clone(),
            GoogleOAuthSettings::new(
                config.google.client_id.clone(),
                config.google.client_secret.clone(),
            ),
        );
        let calendar_client = Arc::new(GoogleCalendarClient::new(resolver, http.clone()));
        let calendar = Arc::new(CalendarManager::new(calendar_client));

        let gemini = Arc::new(
            GeminiClient::new(config.gemini.api_key.clone(), http.clone())
                .with_model(config.gemini.model.clone()),
        );

        let google_login = GoogleLoginSettings {
            client_id: config.google.client_id.clone(),
            client_secret: config.google.client_secret.clone(),
            redirect_url: config.google.redirect_url.clone(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_endpoint: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        };

        Ok(Arc::new(Self {
            tasks: TaskService::new(
                task_repo,
                project_repo.clone(),
                topic_repo.clone(),
                calendar,
            ),
            projects: ProjectService::new(project_repo),
            study: StudyService::new(subject_repo, topic_repo),
            goals: GoalService::new(goal_repo),
            quizzes: QuizService::new(quiz_repo),
            ai_quiz: AiQuizService::new(gemini),
            users: UserService::new(user_repo),
            signer,
            session_ttl_seconds: config.security.session_ttl_seconds,
            crypto,
            http,
            google_login,
        }))
    }
}
