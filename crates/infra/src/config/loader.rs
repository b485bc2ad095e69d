//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes a few conventional paths for config files (TOML or JSON)
//!
//! ## Environment Variables
//! - `CHRONOS_BIND_ADDR`: Server bind address (default `0.0.0.0:8080`)
//! - `CHRONOS_DB_PATH`: Database file path
//! - `CHRONOS_DB_POOL_SIZE`: Connection pool size (default 8)
//! - `CHRONOS_CRYPTO_KEY`: 32-byte key encrypting stored OAuth tokens
//! - `CHRONOS_SESSION_SECRET`: Session-token signing secret (>= 32 bytes)
//! - `CHRONOS_SESSION_TTL_SECONDS`: Session lifetime (default 86400)
//! - `CHRONOS_GOOGLE_CLIENT_ID` / `CHRONOS_GOOGLE_CLIENT_SECRET`
//! - `CHRONOS_GOOGLE_REDIRECT_URL`: OAuth redirect registered with Google
//! - `CHRONOS_GEMINI_API_KEY`: Gemini API key
//! - `CHRONOS_GEMINI_MODEL`: Model name (default `gemini-2.0-flash`)

use std::path::{Path, PathBuf};

use chronos_domain::{ChronosError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub google: GoogleOAuthConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub crypto_key: String,
    pub session_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_pool_size() -> u32 {
    8
}

fn default_session_ttl() -> i64 {
    86_400
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `ChronosError::Config` when neither the environment nor a config
/// file yields a complete configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "incomplete environment configuration, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
pub fn load_from_env() -> Result<Config> {
    let config = Config {
        server: ServerConfig {
            bind_addr: std::env::var("CHRONOS_BIND_ADDR").unwrap_or_else(|_| default_bind_addr()),
        },
        database: DatabaseConfig {
            path: env_var("CHRONOS_DB_PATH")?,
            pool_size: match std::env::var("CHRONOS_DB_POOL_SIZE") {
                Ok(raw) => raw
                    .parse::<u32>()
                    .map_err(|e| ChronosError::Config(format!("invalid pool size: {e}")))?,
                Err(_) => default_pool_size(),
            },
        },
        security: SecurityConfig {
            crypto_key: env_var("CHRONOS_CRYPTO_KEY")?,
            session_secret: env_var("CHRONOS_SESSION_SECRET")?,
            session_ttl_seconds: match std::env::var("CHRONOS_SESSION_TTL_SECONDS") {
                Ok(raw) => raw
                    .parse::<i64>()
                    .map_err(|e| ChronosError::Config(format!("invalid session ttl: {e}")))?,
                Err(_) => default_session_ttl(),
            },
        },
        google: GoogleOAuthConfig {
            client_id: env_var("CHRONOS_GOOGLE_CLIENT_ID")?,
            client_secret: env_var("CHRONOS_GOOGLE_CLIENT_SECRET")?,
            redirect_url: env_var("CHRONOS_GOOGLE_REDIRECT_URL")?,
        },
        gemini: GeminiConfig {
            api_key: env_var("CHRONOS_GEMINI_API_KEY")?,
            model: std::env::var("CHRONOS_GEMINI_MODEL")
                .unwrap_or_else(|_| default_gemini_model()),
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file, probing conventional paths when none is
/// given.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => probe_config_paths().ok_or_else(|| {
            ChronosError::Config("no configuration file found in probed paths".into())
        })?,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        ChronosError::Config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: Config = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents)
            .map_err(|e| ChronosError::Config(format!("invalid JSON config: {e}")))?
    } else {
        toml::from_str(&contents)
            .map_err(|e| ChronosError::Config(format!("invalid TOML config: {e}")))?
    };

    validate(&config)?;
    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "./config.toml",
        "./config.json",
        "./chronos.toml",
        "./chronos.json",
        "../config.toml",
        "../config.json",
    ];

    CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
}

fn validate(config: &Config) -> Result<()> {
    if config.security.crypto_key.len() != 32 {
        return Err(ChronosError::Config("CHRONOS_CRYPTO_KEY must be exactly 32 bytes".into()));
    }
    if config.security.session_secret.len() < 32 {
        return Err(ChronosError::Config(
            "CHRONOS_SESSION_SECRET must be at least 32 bytes".into(),
        ));
    }
    if config.security.session_ttl_seconds <= 0 {
        return Err(ChronosError::Config("session ttl must be positive".into()));
    }
    Ok(())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ChronosError::Config(format!("missing environment variable: {name}")))
}
