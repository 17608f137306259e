// ABOUTME: Routine folder database operations
// ABOUTME: Persists generated multi-day plans and records their Hevy push results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{
    encode_timestamp, from_json_column, from_text_enum, parse_timestamp, parse_uuid,
    to_json_column, Database,
};
use crate::errors::{AppError, AppResult};
use crate::models::RoutineFolder;

const FOLDER_COLUMNS: &str = r"
    id, user_id, name, description, split_type, days_per_week, period, date_range,
    routines, hevy_folder_id, hevy_routine_ids, created_at
";

impl Database {
    /// Create the routine folders table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_routine_folders(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routine_folders (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                split_type TEXT NOT NULL,
                days_per_week INTEGER NOT NULL,
                period TEXT NOT NULL,
                date_range TEXT NOT NULL,
                routines TEXT NOT NULL DEFAULT '[]',
                hevy_folder_id INTEGER,
                hevy_routine_ids TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create routine_folders table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_routine_folders_user ON routine_folders(user_id, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create routine_folders index: {e}")))?;

        Ok(())
    }

    /// Insert or replace a routine folder
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails
    pub async fn save_routine_folder(&self, folder: &RoutineFolder) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO routine_folders (
                id, user_id, name, description, split_type, days_per_week, period,
                date_range, routines, hevy_folder_id, hevy_routine_ids, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                split_type = excluded.split_type,
                days_per_week = excluded.days_per_week,
                period = excluded.period,
                date_range = excluded.date_range,
                routines = excluded.routines,
                hevy_folder_id = excluded.hevy_folder_id,
                hevy_routine_ids = excluded.hevy_routine_ids
            WHERE routine_folders.user_id = excluded.user_id
            ",
        )
        .bind(folder.id.to_string())
        .bind(folder.user_id.to_string())
        .bind(&folder.name)
        .bind(&folder.description)
        .bind(folder.split_type.as_str())
        .bind(i64::from(folder.days_per_week))
        .bind(folder.period.as_str())
        .bind(&folder.date_range)
        .bind(to_json_column(&folder.routines)?)
        .bind(folder.hevy_folder_id)
        .bind(to_json_column(&folder.hevy_routine_ids)?)
        .bind(encode_timestamp(&folder.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save routine folder: {e}")))?;
        Ok(())
    }

    /// Get one of a user's routine folders
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_routine_folder(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
    ) -> AppResult<Option<RoutineFolder>> {
        let query =
            format!("SELECT {FOLDER_COLUMNS} FROM routine_folders WHERE user_id = $1 AND id = $2");
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(folder_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get routine folder: {e}")))?;

        row.as_ref().map(Self::row_to_folder).transpose()
    }

    /// A user's routine folders, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_routine_folders(&self, user_id: Uuid) -> AppResult<Vec<RoutineFolder>> {
        let query = format!(
            "SELECT {FOLDER_COLUMNS} FROM routine_folders WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list routine folders: {e}")))?;

        rows.iter().map(Self::row_to_folder).collect()
    }

    /// Record the Hevy ids created when a folder was pushed
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the folder does not exist, or a database error
    pub async fn mark_routine_folder_pushed(
        &self,
        folder_id: Uuid,
        hevy_folder_id: i64,
        routine_ids: &[String],
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE routine_folders SET hevy_folder_id = $2, hevy_routine_ids = $3 WHERE id = $1",
        )
        .bind(folder_id.to_string())
        .bind(hevy_folder_id)
        .bind(to_json_column(routine_ids)?)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to mark routine folder pushed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(
                AppError::not_found("Routine folder").with_resource_id(folder_id.to_string())
            );
        }
        Ok(())
    }

    /// Delete one of a user's routine folders
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the folder does not exist, or a database error
    pub async fn delete_routine_folder(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM routine_folders WHERE user_id = $1 AND id = $2")
            .bind(user_id.to_string())
            .bind(folder_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete routine folder: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(
                AppError::not_found("Routine folder").with_resource_id(folder_id.to_string())
            );
        }
        Ok(())
    }

    fn row_to_folder(row: &SqliteRow) -> AppResult<RoutineFolder> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let split_type: String = row.get("split_type");
        let period: String = row.get("period");
        let days: i64 = row.get("days_per_week");
        let created_at: String = row.get("created_at");

        Ok(RoutineFolder {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            name: row.get("name"),
            description: row.get("description"),
            split_type: from_text_enum(&split_type)?,
            days_per_week: u8::try_from(days).unwrap_or_default(),
            period: from_text_enum(&period)?,
            date_range: row.get("date_range"),
            routines: from_json_column(row.get("routines"))?,
            hevy_folder_id: row.get("hevy_folder_id"),
            hevy_routine_ids: from_json_column(row.get("hevy_routine_ids"))?,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}
