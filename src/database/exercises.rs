// ABOUTME: Exercise catalog database operations
// ABOUTME: Stores base exercise templates and each user's custom exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{from_json_column, parse_uuid, to_json_column, Database};
use crate::errors::{AppError, AppResult};
use crate::models::Exercise;

const EXERCISE_COLUMNS: &str = r"
    id, title, primary_muscles, secondary_muscles, equipment, exercise_type, is_custom, owner_user_id
";

impl Database {
    /// Create the exercises table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_exercises(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                primary_muscles TEXT NOT NULL DEFAULT '[]',
                secondary_muscles TEXT NOT NULL DEFAULT '[]',
                equipment TEXT NOT NULL DEFAULT '[]',
                exercise_type TEXT NOT NULL DEFAULT 'weight_reps',
                is_custom BOOLEAN NOT NULL DEFAULT 0,
                owner_user_id TEXT REFERENCES users(id) ON DELETE CASCADE
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercises table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_owner ON exercises(owner_user_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create exercises index: {e}")))?;

        Ok(())
    }

    /// Upsert exercises as base templates (`owner = None`) or a user's custom set
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or a database write fails
    pub async fn save_exercises(&self, exercises: &[Exercise], owner: Option<Uuid>) -> AppResult<()> {
        let owner = owner.map(|id| id.to_string());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        for exercise in exercises {
            sqlx::query(
                r"
                INSERT INTO exercises (
                    id, title, primary_muscles, secondary_muscles, equipment,
                    exercise_type, is_custom, owner_user_id
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    primary_muscles = excluded.primary_muscles,
                    secondary_muscles = excluded.secondary_muscles,
                    equipment = excluded.equipment,
                    exercise_type = excluded.exercise_type,
                    is_custom = excluded.is_custom,
                    owner_user_id = excluded.owner_user_id
                ",
            )
            .bind(&exercise.id)
            .bind(&exercise.title)
            .bind(to_json_column(&exercise.primary_muscles)?)
            .bind(to_json_column(&exercise.secondary_muscles)?)
            .bind(to_json_column(&exercise.equipment)?)
            .bind(&exercise.exercise_type)
            .bind(owner.is_some() || exercise.is_custom)
            .bind(owner.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to save exercise {}: {e}", exercise.id))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exercises: {e}")))?;
        Ok(())
    }

    /// Delete base exercises by id, leaving custom exercises untouched
    ///
    /// # Errors
    ///
    /// Returns an error if a database write fails
    pub async fn delete_base_exercises(&self, ids: &HashSet<String>) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut deleted = 0;
        for id in ids {
            deleted += sqlx::query("DELETE FROM exercises WHERE id = $1 AND owner_user_id IS NULL")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to delete exercise {id}: {e}")))?
                .rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exercise deletes: {e}")))?;
        Ok(deleted)
    }

    /// Base exercises plus the given user's custom exercises, ordered by title
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_exercises(&self, owner: Option<Uuid>) -> AppResult<Vec<Exercise>> {
        let query = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE owner_user_id IS NULL OR owner_user_id = $1 ORDER BY title"
        );
        let rows = sqlx::query(&query)
            .bind(owner.map(|id| id.to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(Self::row_to_exercise).collect()
    }

    /// Only the custom exercises owned by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn custom_exercises(&self, user_id: Uuid) -> AppResult<Vec<Exercise>> {
        let query = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE owner_user_id = $1 ORDER BY title"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list custom exercises: {e}")))?;

        rows.iter().map(Self::row_to_exercise).collect()
    }

    /// Every stored exercise, base and custom, for building the index
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn all_exercises(&self) -> AppResult<Vec<Exercise>> {
        let query = format!("SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY title");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(Self::row_to_exercise).collect()
    }

    /// Whether any base exercises have been stored
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn base_exercises_bootstrapped(&self) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM exercises WHERE owner_user_id IS NULL)")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check exercises: {e}")))?;
        Ok(exists)
    }

    fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
        let owner: Option<String> = row.get("owner_user_id");

        Ok(Exercise {
            id: row.get("id"),
            title: row.get("title"),
            primary_muscles: from_json_column(row.get("primary_muscles"))?,
            secondary_muscles: from_json_column(row.get("secondary_muscles"))?,
            equipment: from_json_column(row.get("equipment"))?,
            exercise_type: row.get("exercise_type"),
            is_custom: row.get("is_custom"),
            owner_user_id: owner.as_deref().map(parse_uuid).transpose()?,
        })
    }
}
