// ABOUTME: SQLite storage for profiles, workouts, exercises, routine folders, and embeddings
// ABOUTME: Owns the connection pool, schema migrations, and shared row decoding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! All persistent state lives in a single `SQLite` database accessed through a
//! `sqlx` pool. Each domain keeps its queries in its own file as an
//! `impl Database` block with a matching `migrate_*` function.

mod embeddings;
mod exercises;
mod routine_folders;
mod sync_state;
mod users;
mod workouts;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::storage::{KEY_LEN, MAX_CONNECTIONS};
use crate::crypto::ApiKeyCipher;
use crate::errors::{AppError, AppResult};

/// In-memory `SQLite` URL; every pooled connection would otherwise get its own database
const MEMORY_URL: &str = "sqlite::memory:";

/// Database manager for all Spotter storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
    cipher: ApiKeyCipher,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &str, encryption_key: [u8; KEY_LEN]) -> AppResult<Self> {
        let is_memory = database_url == MEMORY_URL;

        // Create the file on first use; in-memory databases have no file
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(!is_memory)
            .foreign_keys(true);

        let options = if is_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = options
            .connect_with(connect_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self {
            pool,
            cipher: ApiKeyCipher::new(encryption_key),
        };
        db.migrate().await?;

        info!(memory = is_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_workouts().await?;
        self.migrate_exercises().await?;
        self.migrate_routine_folders().await?;
        self.migrate_sync_state().await?;
        self.migrate_embedding_cache().await?;

        debug!("Database migrations complete");
        Ok(())
    }

    /// Round-trip a trivial query for readiness checks
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    pub(crate) const fn cipher(&self) -> &ApiKeyCipher {
        &self.cipher
    }
}

/// Fixed-width UTC timestamps so TEXT columns sort chronologically
pub(crate) fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp '{value}': {e}")))
}

pub(crate) fn parse_optional_timestamp(value: Option<String>) -> AppResult<Option<DateTime<Utc>>> {
    value.as_deref().map(parse_timestamp).transpose()
}

pub(crate) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::database(format!("Invalid UUID '{value}': {e}")))
}

pub(crate) fn to_json_column<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::database(format!("Failed to encode JSON column: {e}")))
}

pub(crate) fn from_json_column<T: DeserializeOwned>(value: &str) -> AppResult<T> {
    serde_json::from_str(value)
        .map_err(|e| AppError::database(format!("Failed to decode JSON column: {e}")))
}

/// Decode a snake_case enum stored as plain TEXT
pub(crate) fn from_text_enum<T: DeserializeOwned>(value: &str) -> AppResult<T> {
    serde_json::from_value(serde_json::Value::String(value.to_owned()))
        .map_err(|e| AppError::database(format!("Invalid stored value '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let early = DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2025-01-01T10:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);

        let (a, b) = (encode_timestamp(&early), encode_timestamp(&later));
        assert!(a < b);
        assert_eq!(parse_timestamp(&a).unwrap(), early);
    }

    #[test]
    fn test_text_enum_decoding() {
        let level: crate::models::ExperienceLevel = from_text_enum("advanced").unwrap();
        assert_eq!(level, crate::models::ExperienceLevel::Advanced);
        assert!(from_text_enum::<crate::models::ExperienceLevel>("elite").is_err());
    }
}
