// ABOUTME: Workout history database operations
// ABOUTME: Upserts, Hevy-deduplicated imports, ranged reads, stats, and per-exercise progression
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{
    encode_timestamp, from_json_column, parse_optional_timestamp, parse_timestamp, parse_uuid,
    to_json_column, Database,
};
use crate::errors::{AppError, AppResult};
use crate::models::{ProgressionEntry, Workout, WorkoutStats};

const WORKOUT_COLUMNS: &str = r"
    id, user_id, hevy_id, title, description, start_time, end_time, exercises,
    created_at, updated_at, last_synced
";

impl Database {
    /// Create the workouts table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                hevy_id TEXT,
                title TEXT NOT NULL,
                description TEXT,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                exercises TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_synced TEXT,
                UNIQUE(user_id, hevy_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workouts table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_start ON workouts(user_id, start_time)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workouts index: {e}")))?;

        Ok(())
    }

    /// Insert or replace a workout by id
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails
    pub async fn save_workout(&self, workout: &Workout) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workouts (
                id, user_id, hevy_id, title, description, start_time, end_time,
                exercises, created_at, updated_at, last_synced
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT(id) DO UPDATE SET
                hevy_id = excluded.hevy_id,
                title = excluded.title,
                description = excluded.description,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                exercises = excluded.exercises,
                updated_at = excluded.updated_at,
                last_synced = excluded.last_synced
            WHERE workouts.user_id = excluded.user_id
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(&workout.hevy_id)
        .bind(&workout.title)
        .bind(&workout.description)
        .bind(encode_timestamp(&workout.start_time))
        .bind(encode_timestamp(&workout.end_time))
        .bind(to_json_column(&workout.exercises)?)
        .bind(encode_timestamp(&workout.created_at))
        .bind(encode_timestamp(&workout.updated_at))
        .bind(workout.last_synced.as_ref().map(encode_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save workout: {e}")))?;
        Ok(())
    }

    /// Insert a workout imported from Hevy unless that Hevy id is already stored
    ///
    /// Returns `true` if the workout was written.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the workout has no Hevy id, or a database error
    pub async fn save_synced_workout(&self, workout: &Workout) -> AppResult<bool> {
        let Some(hevy_id) = workout.hevy_id.as_deref() else {
            return Err(AppError::invalid_input("Synced workout is missing its Hevy id"));
        };

        let result = sqlx::query(
            r"
            INSERT INTO workouts (
                id, user_id, hevy_id, title, description, start_time, end_time,
                exercises, created_at, updated_at, last_synced
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT(user_id, hevy_id) DO NOTHING
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(hevy_id)
        .bind(&workout.title)
        .bind(&workout.description)
        .bind(encode_timestamp(&workout.start_time))
        .bind(encode_timestamp(&workout.end_time))
        .bind(to_json_column(&workout.exercises)?)
        .bind(encode_timestamp(&workout.created_at))
        .bind(encode_timestamp(&workout.updated_at))
        .bind(workout.last_synced.as_ref().map(encode_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save synced workout: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Get one of a user's workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<Option<Workout>> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 AND id = $2");
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(workout_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;

        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// List a user's workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<Workout>> {
        let query = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY start_time DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    /// Workouts that started within `[start, end]`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn workouts_in_range(
        &self,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Workout>> {
        let query = format!(
            r"
            SELECT {WORKOUT_COLUMNS} FROM workouts
            WHERE user_id = $1
              AND ($2 IS NULL OR start_time >= $2)
              AND ($3 IS NULL OR start_time <= $3)
            ORDER BY start_time ASC
            "
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(start.as_ref().map(encode_timestamp))
            .bind(end.as_ref().map(encode_timestamp))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load workouts in range: {e}")))?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    /// Every Hevy id already imported for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn existing_hevy_ids(&self, user_id: Uuid) -> AppResult<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT hevy_id FROM workouts WHERE user_id = $1 AND hevy_id IS NOT NULL",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load Hevy ids: {e}")))?;

        Ok(ids.into_iter().collect())
    }

    /// Delete one of a user's workouts
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the workout does not exist, or a database error
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM workouts WHERE user_id = $1 AND id = $2")
            .bind(user_id.to_string())
            .bind(workout_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Workout").with_resource_id(workout_id.to_string()));
        }
        Ok(())
    }

    /// Aggregate totals over a user's workouts in an optional date range
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn workout_stats(
        &self,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> AppResult<WorkoutStats> {
        let workouts = self.workouts_in_range(user_id, start, end).await?;

        Ok(WorkoutStats {
            total_workouts: workouts.len() as u64,
            total_exercises: workouts.iter().map(|w| w.exercises.len() as u64).sum(),
            total_duration_minutes: workouts.iter().map(Workout::duration_minutes).sum(),
            last_workout_date: workouts.iter().map(|w| w.start_time).max(),
        })
    }

    /// Chronological sets performed for one exercise template
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exercise_progression(
        &self,
        user_id: Uuid,
        exercise_template_id: &str,
    ) -> AppResult<Vec<ProgressionEntry>> {
        let workouts = self.workouts_in_range(user_id, None, None).await?;

        Ok(workouts
            .into_iter()
            .filter_map(|workout| {
                let sets: Vec<_> = workout
                    .exercises
                    .into_iter()
                    .filter(|e| e.exercise_template_id == exercise_template_id)
                    .flat_map(|e| e.sets)
                    .collect();
                (!sets.is_empty()).then_some(ProgressionEntry {
                    date: workout.start_time,
                    workout_id: workout.id,
                    sets,
                })
            })
            .collect())
    }

    fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let start_time: String = row.get("start_time");
        let end_time: String = row.get("end_time");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(Workout {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            hevy_id: row.get("hevy_id"),
            title: row.get("title"),
            description: row.get("description"),
            start_time: parse_timestamp(&start_time)?,
            end_time: parse_timestamp(&end_time)?,
            exercises: from_json_column(row.get("exercises"))?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
            last_synced: parse_optional_timestamp(row.get("last_synced"))?,
        })
    }
}
