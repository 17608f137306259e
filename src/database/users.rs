// ABOUTME: User profile database operations
// ABOUTME: Registration, credential checks, partial profile updates, and encrypted Hevy keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{
    encode_timestamp, from_json_column, from_text_enum, parse_optional_timestamp,
    parse_timestamp, parse_uuid, to_json_column, Database,
};
use crate::constants::profile::{MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN};
use crate::crypto::{hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::models::{ProfileUpdate, UserProfile};

const USER_COLUMNS: &str = r"
    id, username, email, height_cm, weight_kg, sex, age, weight_history, fitness_goals,
    injuries, available_equipment, preferred_workout_days, preferred_workout_duration,
    preferred_workout_time, experience_level, notes, hevy_api_key IS NOT NULL AS has_hevy_api_key,
    hevy_api_key_updated_at, created_at, updated_at
";

/// Check username, email, and password shape before touching the database
fn validate_registration(username: &str, email: &str, password: &str) -> AppResult<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(AppError::invalid_input(format!(
            "Username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AppError::invalid_input(
            "Username may only contain letters, digits, '_', '.', and '-'",
        ));
    }
    if !email.contains('@') {
        return Err(AppError::invalid_input("Email address is invalid"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl Database {
    /// Create the users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                height_cm REAL,
                weight_kg REAL,
                sex TEXT,
                age INTEGER,
                weight_history TEXT NOT NULL DEFAULT '[]',
                fitness_goals TEXT NOT NULL DEFAULT '[]',
                injuries TEXT NOT NULL DEFAULT '[]',
                available_equipment TEXT NOT NULL DEFAULT '[]',
                preferred_workout_days INTEGER NOT NULL DEFAULT 3,
                preferred_workout_duration INTEGER NOT NULL DEFAULT 60,
                preferred_workout_time TEXT,
                experience_level TEXT NOT NULL DEFAULT 'beginner',
                notes TEXT,
                hevy_api_key TEXT,
                hevy_api_key_updated_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create users index: {e}")))?;

        Ok(())
    }

    /// Register a new user with a bcrypt-hashed password
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a malformed username, email, or password,
    /// `RESOURCE_ALREADY_EXISTS` if the username is taken, or a database error
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserProfile> {
        let username = username.trim();
        let email = email.trim();
        validate_registration(username, email, password)?;

        if self.username_exists(username).await? {
            return Err(AppError::already_exists(format!(
                "Username '{username}' is already taken"
            )));
        }

        let profile = UserProfile::new(username, email);
        let password_hash = hash_password(password)?;

        sqlx::query(
            r"
            INSERT INTO users (
                id, username, email, password_hash, preferred_workout_days,
                preferred_workout_duration, experience_level, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(profile.id.to_string())
        .bind(&profile.username)
        .bind(&profile.email)
        .bind(password_hash)
        .bind(i64::from(profile.preferred_workout_days))
        .bind(i64::from(profile.preferred_workout_duration))
        .bind(profile.experience_level.as_str())
        .bind(encode_timestamp(&profile.created_at))
        .bind(encode_timestamp(&profile.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::already_exists(
                format!("Username '{}' is already taken", profile.username),
            ),
            other => AppError::database(format!("Failed to create user: {other}")),
        })?;

        Ok(profile)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<UserProfile>> {
        self.get_user_impl("username", username).await
    }

    /// Get a user by ID, returning `RESOURCE_NOT_FOUND` if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the user does not exist
    pub async fn get_user_required(&self, user_id: Uuid) -> AppResult<UserProfile> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> AppResult<Option<UserProfile>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {field} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Whether a username is already registered
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check username: {e}")))?;
        Ok(exists)
    }

    /// Check a username/password pair
    ///
    /// Returns `None` for an unknown user or a wrong password so callers
    /// cannot tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored hash is malformed
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE username = $1")
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load credentials: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let hash: String = row.get("password_hash");
        if !verify_password(password, &hash)? {
            return Ok(None);
        }

        let id: String = row.get("id");
        self.get_user(parse_uuid(&id)?).await
    }

    /// Apply a partial profile update
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if a value is out of range, `RESOURCE_NOT_FOUND`
    /// if the user does not exist, or a database error
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        let mut profile = self.get_user_required(user_id).await?;
        update.apply_to(&mut profile)?;
        profile.updated_at = Utc::now();
        self.write_profile(&profile).await?;
        Ok(profile)
    }

    /// Append a body-weight measurement to the history
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a non-positive weight, `RESOURCE_NOT_FOUND`
    /// if the user does not exist, or a database error
    pub async fn record_weight(&self, user_id: Uuid, weight_kg: f64) -> AppResult<UserProfile> {
        let mut profile = self.get_user_required(user_id).await?;
        profile.record_weight(weight_kg, Utc::now())?;
        self.write_profile(&profile).await?;
        Ok(profile)
    }

    async fn write_profile(&self, profile: &UserProfile) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE users SET
                email = $2,
                height_cm = $3,
                weight_kg = $4,
                sex = $5,
                age = $6,
                weight_history = $7,
                fitness_goals = $8,
                injuries = $9,
                available_equipment = $10,
                preferred_workout_days = $11,
                preferred_workout_duration = $12,
                preferred_workout_time = $13,
                experience_level = $14,
                notes = $15,
                updated_at = $16
            WHERE id = $1
            ",
        )
        .bind(profile.id.to_string())
        .bind(&profile.email)
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.sex.map(|s| s.as_str()))
        .bind(profile.age.map(i64::from))
        .bind(to_json_column(&profile.weight_history)?)
        .bind(to_json_column(&profile.fitness_goals)?)
        .bind(to_json_column(&profile.injuries)?)
        .bind(to_json_column(&profile.available_equipment)?)
        .bind(i64::from(profile.preferred_workout_days))
        .bind(i64::from(profile.preferred_workout_duration))
        .bind(&profile.preferred_workout_time)
        .bind(profile.experience_level.as_str())
        .bind(&profile.notes)
        .bind(encode_timestamp(&profile.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile: {e}")))?;
        Ok(())
    }

    /// Delete a user together with their workouts, exercises, folders, and sync state
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the user does not exist, or a database error
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        let id = user_id.to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        for table in ["workouts", "routine_folders", "sync_state"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to delete {table}: {e}")))?;
        }
        sqlx::query("DELETE FROM exercises WHERE owner_user_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete exercises: {e}")))?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User").with_resource_id(id));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit user deletion: {e}")))?;
        Ok(())
    }

    /// Store a Hevy API key encrypted with AES-256-GCM
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a blank key, `RESOURCE_NOT_FOUND` if the
    /// user does not exist, or an encryption/database error
    pub async fn set_hevy_api_key(&self, user_id: Uuid, api_key: &str) -> AppResult<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::invalid_input("Hevy API key must not be empty"));
        }
        let encrypted = self.cipher().encrypt(api_key)?;
        let now = encode_timestamp(&Utc::now());

        let result = sqlx::query(
            "UPDATE users SET hevy_api_key = $2, hevy_api_key_updated_at = $3, updated_at = $3 WHERE id = $1",
        )
        .bind(user_id.to_string())
        .bind(encrypted)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store Hevy API key: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }
        Ok(())
    }

    /// Decrypt the stored Hevy API key, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails
    pub async fn hevy_api_key(&self, user_id: Uuid) -> AppResult<Option<String>> {
        let encrypted: Option<Option<String>> =
            sqlx::query_scalar("SELECT hevy_api_key FROM users WHERE id = $1")
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to load Hevy API key: {e}")))?;

        encrypted
            .flatten()
            .map(|value| self.cipher().decrypt(&value))
            .transpose()
    }

    /// Remove the stored Hevy API key
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub async fn clear_hevy_api_key(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET hevy_api_key = NULL, hevy_api_key_updated_at = $2, updated_at = $2 WHERE id = $1",
        )
        .bind(user_id.to_string())
        .bind(encode_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear Hevy API key: {e}")))?;
        Ok(())
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<UserProfile> {
        let id: String = row.get("id");
        let sex: Option<String> = row.get("sex");
        let age: Option<i64> = row.get("age");
        let days: i64 = row.get("preferred_workout_days");
        let duration: i64 = row.get("preferred_workout_duration");
        let level: String = row.get("experience_level");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(UserProfile {
            id: parse_uuid(&id)?,
            username: row.get("username"),
            email: row.get("email"),
            height_cm: row.get("height_cm"),
            weight_kg: row.get("weight_kg"),
            sex: sex.as_deref().map(from_text_enum).transpose()?,
            age: age.and_then(|a| u32::try_from(a).ok()),
            weight_history: from_json_column(row.get("weight_history"))?,
            fitness_goals: from_json_column(row.get("fitness_goals"))?,
            injuries: from_json_column(row.get("injuries"))?,
            available_equipment: from_json_column(row.get("available_equipment"))?,
            preferred_workout_days: u8::try_from(days).unwrap_or_default(),
            preferred_workout_duration: u32::try_from(duration).unwrap_or_default(),
            preferred_workout_time: row.get("preferred_workout_time"),
            experience_level: from_text_enum(&level)?,
            notes: row.get("notes"),
            has_hevy_api_key: row.get("has_hevy_api_key"),
            hevy_api_key_updated_at: parse_optional_timestamp(row.get("hevy_api_key_updated_at"))?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_validation() {
        assert!(validate_registration("lifter_01", "a@b.c", "password123").is_ok());
        assert!(validate_registration("ab", "a@b.c", "password123").is_err());
        assert!(validate_registration("bad name", "a@b.c", "password123").is_err());
        assert!(validate_registration("lifter", "not-an-email", "password123").is_err());
        assert!(validate_registration("lifter", "a@b.c", "short").is_err());
    }
}
