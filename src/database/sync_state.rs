// ABOUTME: Per-user Hevy sync bookkeeping
// ABOUTME: Tracks when each user's workouts were last pulled from Hevy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{encode_timestamp, parse_optional_timestamp, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_sync_state(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sync_state (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                last_sync TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create sync_state table: {e}")))?;
        Ok(())
    }

    /// When the user's workouts were last synced
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn last_sync(&self, user_id: Uuid) -> AppResult<Option<DateTime<Utc>>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT last_sync FROM sync_state WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to load last sync: {e}")))?;
        parse_optional_timestamp(value)
    }

    /// Record a completed sync
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn set_last_sync(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO sync_state (user_id, last_sync) VALUES ($1, $2)
            ON CONFLICT(user_id) DO UPDATE SET last_sync = excluded.last_sync
            ",
        )
        .bind(user_id.to_string())
        .bind(encode_timestamp(&at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record last sync: {e}")))?;
        Ok(())
    }
}
