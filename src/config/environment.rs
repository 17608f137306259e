// ABOUTME: Environment configuration for the Spotter server
// ABOUTME: Parses ports, database URL, secrets, model, embedding, and Hevy settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration. Nothing is read from files.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use crate::constants::{
    auth as auth_consts, embeddings as embedding_consts, http_client, llm as llm_consts, network,
    storage,
};
use crate::crypto::{decode_encryption_key, encode_encryption_key, generate_encryption_key};
use crate::errors::{AppError, AppResult};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; missing secrets are generated
    #[default]
    Development,
    /// Production; secrets must be supplied
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL or bare path
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` for URL schemes other than `sqlite:`
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if let Some(path) = trimmed.strip_prefix("sqlite:") {
            let path = path.trim_start_matches("//");
            if path == ":memory:" || path.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path),
                })
            }
        } else if trimmed.contains("://") {
            Err(AppError::config(format!(
                "Unsupported database URL: {trimmed} (only sqlite is supported)"
            )))
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(trimmed),
            })
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/spotter.db"),
        }
    }
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// OpenAI embeddings API
    OpenAi,
    /// Offline feature hashing
    Hashing,
}

impl FromStr for EmbeddingProviderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "hashing" | "local" => Ok(Self::Hashing),
            other => Err(AppError::config(format!(
                "Unknown EMBEDDING_PROVIDER: {other} (expected openai or hashing)"
            ))),
        }
    }
}

impl fmt::Display for EmbeddingProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Hashing => write!(f, "hashing"),
        }
    }
}

/// Language model settings
#[derive(Clone)]
pub struct LlmConfig {
    /// API key; generation is unavailable without one
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Chat model
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Embedding settings
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Backend
    pub provider: EmbeddingProviderType,
    /// Model name for the OpenAI backend
    pub model: String,
    /// Vector dimension for the hashing backend
    pub dimension: usize,
}

/// Hevy integration settings
#[derive(Debug, Clone)]
pub struct HevyConfig {
    /// API base URL
    pub base_url: String,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Copy)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout_secs: u64,
    /// Connect timeout
    pub connect_timeout_secs: u64,
}

/// Complete server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HTTP port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database_url: DatabaseUrl,
    /// AES-256 key for stored API keys
    pub encryption_key: [u8; 32],
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT lifetime
    pub jwt_expiry_hours: i64,
    /// Language model
    pub llm: LlmConfig,
    /// Embeddings
    pub embeddings: EmbeddingConfig,
    /// Hevy
    pub hevy: HevyConfig,
    /// Outbound HTTP
    pub http_client: HttpClientConfig,
    /// Allowed CORS origins (`*` for any)
    pub cors_origins: Vec<String>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed, or if a production
    /// deployment is missing a required secret
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));
        let openai_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());

        let embedding_default = if openai_key.is_some() { "openai" } else { "hashing" };

        let config = Self {
            http_port: parse_env("HTTP_PORT", network::DEFAULT_HTTP_PORT)?,
            host: env_var_or("HOST", network::DEFAULT_HOST),
            environment,
            database_url: DatabaseUrl::parse_url(&env_var_or(
                "DATABASE_URL",
                storage::DEFAULT_DATABASE_URL,
            ))?,
            encryption_key: load_encryption_key(environment)?,
            jwt_secret: load_jwt_secret(environment)?,
            jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", auth_consts::DEFAULT_JWT_EXPIRY_HOURS)?,
            llm: LlmConfig {
                api_key: openai_key,
                base_url: env_var_or("OPENAI_BASE_URL", llm_consts::DEFAULT_OPENAI_BASE_URL),
                model: env_var_or("OPENAI_MODEL", llm_consts::DEFAULT_MODEL),
                temperature: parse_env("LLM_TEMPERATURE", llm_consts::DEFAULT_TEMPERATURE)?,
            },
            embeddings: EmbeddingConfig {
                provider: env_var_or("EMBEDDING_PROVIDER", embedding_default).parse()?,
                model: env_var_or("EMBEDDING_MODEL", embedding_consts::DEFAULT_EMBEDDING_MODEL),
                dimension: parse_env(
                    "EMBEDDING_DIMENSION",
                    embedding_consts::DEFAULT_HASHING_DIMENSION,
                )?,
            },
            hevy: HevyConfig {
                base_url: env_var_or("HEVY_BASE_URL", spotter_hevy::DEFAULT_BASE_URL),
            },
            http_client: HttpClientConfig {
                timeout_secs: parse_env(
                    "HTTP_CLIENT_TIMEOUT_SECS",
                    http_client::DEFAULT_TIMEOUT_SECS,
                )?,
                connect_timeout_secs: parse_env(
                    "HTTP_CLIENT_CONNECT_TIMEOUT_SECS",
                    http_client::DEFAULT_CONNECT_TIMEOUT_SECS,
                )?,
            },
            cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID`-style errors for out-of-range values
    pub fn validate(&self) -> AppResult<()> {
        if self.jwt_expiry_hours <= 0 {
            return Err(AppError::config("JWT_EXPIRY_HOURS must be positive"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AppError::config("LLM_TEMPERATURE must be between 0.0 and 2.0"));
        }
        for (name, value) in [
            ("OPENAI_BASE_URL", &self.llm.base_url),
            ("HEVY_BASE_URL", &self.hevy.base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::config(format!("Invalid {name} '{value}': {e}")))?;
        }
        if self.embeddings.dimension == 0 {
            return Err(AppError::config("EMBEDDING_DIMENSION must be positive"));
        }
        if self.embeddings.provider == EmbeddingProviderType::OpenAi && self.llm.api_key.is_none() {
            return Err(AppError::config(
                "EMBEDDING_PROVIDER=openai requires OPENAI_API_KEY",
            ));
        }
        if self.llm.api_key.is_none() {
            warn!("OPENAI_API_KEY not set; routine generation is disabled");
        }
        if self.environment.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            warn!("CORS allows any origin in production");
        }
        Ok(())
    }

    /// Configuration summary for logging, with secrets masked
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Spotter Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Database: {}\n\
             - JWT expiry: {}h\n\
             - LLM: {} via {} (key {})\n\
             - Embeddings: {} ({})\n\
             - Hevy: {}\n\
             - CORS: {}",
            self.environment,
            self.host,
            self.http_port,
            self.database_url.to_connection_string(),
            self.jwt_expiry_hours,
            self.llm.model,
            self.llm.base_url,
            if self.llm.api_key.is_some() { "set" } else { "missing" },
            self.embeddings.provider,
            match self.embeddings.provider {
                EmbeddingProviderType::OpenAi => self.embeddings.model.clone(),
                EmbeddingProviderType::Hashing => format!("{} dims", self.embeddings.dimension),
            },
            self.hevy.base_url,
            self.cors_origins.join(", "),
        )
    }
}

fn load_encryption_key(environment: Environment) -> AppResult<[u8; 32]> {
    match env::var("SPOTTER_ENCRYPTION_KEY") {
        Ok(encoded) => decode_encryption_key(&encoded),
        Err(_) if environment.is_production() => Err(AppError::config(
            "SPOTTER_ENCRYPTION_KEY is required in production",
        )),
        Err(_) => {
            let key = generate_encryption_key();
            warn!(
                "Generated encryption key (stored Hevy keys will not survive a restart): SPOTTER_ENCRYPTION_KEY={}",
                encode_encryption_key(&key)
            );
            Ok(key)
        }
    }
}

fn load_jwt_secret(environment: Environment) -> AppResult<String> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => Ok(secret),
        _ if environment.is_production() => {
            Err(AppError::config("JWT_SECRET is required in production"))
        }
        _ => {
            warn!("JWT_SECRET not set; generated a random secret, sessions end on restart");
            Ok(encode_encryption_key(&generate_encryption_key()))
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to a default when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
#[must_use]
pub fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".into()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
