// ABOUTME: Hevy synchronisation of exercise templates, workouts, and routine folders
// ABOUTME: Pulls templates and new workouts into the stores and pushes generated folders back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use spotter_hevy::HevyClient;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::ExerciseIndex;
use crate::constants::sync::DEFAULT_LOOKBACK_DAYS;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{Exercise, UserProfile};

/// Outcome of a workout sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Workouts returned by Hevy for the window
    pub fetched: usize,
    /// Workouts stored for the first time
    pub imported: usize,
    /// Workouts already stored
    pub skipped: usize,
}

/// Outcome of an exercise template sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseSyncReport {
    /// Shared templates stored
    pub base: usize,
    /// The user's custom templates stored
    pub custom: usize,
    /// Templates added to the similarity index
    pub indexed: usize,
    /// Built-in entries dropped because Hevy returned the same title under another id
    pub replaced: usize,
}

/// Outcome of pushing a routine folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushReport {
    /// Hevy folder id
    pub folder_id: i64,
    /// Hevy ids of the routines created
    pub routine_ids: Vec<String>,
    /// Titles of routines Hevy rejected
    pub failed: Vec<String>,
}

/// Moves data between Spotter and a user's Hevy account
pub struct HevySyncService {
    db: Database,
    index: Arc<ExerciseIndex>,
    hevy_base_url: String,
}

impl HevySyncService {
    /// Create a sync service talking to the Hevy API at `hevy_base_url`
    #[must_use]
    pub fn new(db: Database, index: Arc<ExerciseIndex>, hevy_base_url: impl Into<String>) -> Self {
        Self {
            db,
            index,
            hevy_base_url: hevy_base_url.into(),
        }
    }

    /// Hevy client authenticated with the user's stored key
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the user has no Hevy key, or an error if it cannot be decrypted
    pub async fn client_for(&self, user: &UserProfile) -> AppResult<HevyClient> {
        let api_key = self
            .db
            .hevy_api_key(user.id)
            .await?
            .ok_or_else(|| AppError::invalid_input("Hevy API key not configured"))?;
        HevyClient::new(api_key, self.hevy_base_url.clone())
    }

    /// Pull every exercise template, store it, and index it
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy, the database, or the embedding provider fails
    pub async fn sync_exercises(&self, user: &UserProfile) -> AppResult<ExerciseSyncReport> {
        let client = self.client_for(user).await?;
        let templates = client.all_exercise_templates().await?;

        let (custom, base): (Vec<Exercise>, Vec<Exercise>) = templates
            .into_iter()
            .map(Exercise::from)
            .partition(|e| e.is_custom);
        let custom: Vec<Exercise> = custom
            .into_iter()
            .map(|mut e| {
                e.owner_user_id = Some(user.id);
                e
            })
            .collect();

        let shadowed = self.shadowed_base_ids(&base).await?;
        if !shadowed.is_empty() {
            self.db.delete_base_exercises(&shadowed).await?;
            self.index.remove_exercises(&shadowed).await;
        }

        self.db.save_exercises(&base, None).await?;
        self.db.save_exercises(&custom, Some(user.id)).await?;

        let report = ExerciseSyncReport {
            base: base.len(),
            custom: custom.len(),
            indexed: self
                .index
                .add_exercises(base.into_iter().chain(custom).collect())
                .await?,
            replaced: shadowed.len(),
        };
        info!(
            user_id = %user.id,
            base = report.base,
            custom = report.custom,
            indexed = report.indexed,
            replaced = report.replaced,
            "Synced Hevy exercise templates"
        );
        Ok(report)
    }

    /// Stored base exercises whose title matches a synced template under a different id
    async fn shadowed_base_ids(&self, synced: &[Exercise]) -> AppResult<HashSet<String>> {
        let synced_ids: HashSet<&str> = synced.iter().map(|e| e.id.as_str()).collect();
        let synced_titles: HashSet<String> =
            synced.iter().map(|e| e.title.trim().to_lowercase()).collect();

        Ok(self
            .db
            .list_exercises(None)
            .await?
            .into_iter()
            .filter(|stored| {
                !synced_ids.contains(stored.id.as_str())
                    && synced_titles.contains(&stored.title.trim().to_lowercase())
            })
            .map(|stored| stored.id)
            .collect())
    }

    /// Import workouts started since `since`, the last sync, or the default look-back window
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy or the database fails
    pub async fn sync_workouts(
        &self,
        user: &UserProfile,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<SyncReport> {
        let client = self.client_for(user).await?;
        let since = match since {
            Some(explicit) => explicit,
            None => self
                .db
                .last_sync(user.id)
                .await?
                .unwrap_or_else(|| Utc::now() - Duration::days(DEFAULT_LOOKBACK_DAYS)),
        };

        let workouts = client.workouts_since(since).await?;
        let existing = self.db.existing_hevy_ids(user.id).await?;

        let mut report = SyncReport {
            fetched: workouts.len(),
            imported: 0,
            skipped: 0,
        };
        let synced_at = Utc::now();
        for hevy_workout in workouts {
            if existing.contains(&hevy_workout.id) {
                report.skipped += 1;
                continue;
            }
            let mut workout = hevy_workout.into_workout(user.id);
            workout.last_synced = Some(synced_at);
            if self.db.save_synced_workout(&workout).await? {
                report.imported += 1;
            } else {
                report.skipped += 1;
            }
        }

        self.db.set_last_sync(user.id, synced_at).await?;
        AppLogger::log_sync_event(
            &user.id.to_string(),
            report.fetched,
            report.imported,
            report.skipped,
        );
        Ok(report)
    }

    /// Create a Hevy folder for a stored routine folder and push each routine into it
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown folder, `RESOURCE_ALREADY_EXISTS`
    /// if it was pushed before, or `EXTERNAL_SERVICE_ERROR` if no routine was created
    pub async fn push_routine_folder(
        &self,
        user: &UserProfile,
        folder_id: Uuid,
    ) -> AppResult<PushReport> {
        let folder = self
            .db
            .get_routine_folder(user.id, folder_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Routine folder").with_resource_id(folder_id.to_string())
            })?;
        if let Some(hevy_folder_id) = folder.hevy_folder_id {
            return Err(AppError::already_exists(format!(
                "Routine folder was already pushed to Hevy folder {hevy_folder_id}"
            )));
        }

        let client = self.client_for(user).await?;
        let hevy_folder_id = client.create_routine_folder(&folder.name).await?;

        let mut routine_ids = Vec::with_capacity(folder.routines.len());
        let mut failed = Vec::new();
        for routine in &folder.routines {
            let mut routine = routine.clone();
            routine.folder_id = Some(hevy_folder_id);
            match client.create_routine(&routine).await {
                Ok(id) => routine_ids.push(id),
                Err(e) => {
                    warn!(title = %routine.title, error = %e, "Failed to create Hevy routine");
                    failed.push(routine.title);
                }
            }
        }

        AppLogger::log_push_event(
            &user.id.to_string(),
            hevy_folder_id,
            routine_ids.len(),
            failed.len(),
        );
        if routine_ids.is_empty() {
            return Err(AppError::external_service(
                "Hevy",
                format!(
                    "No routines could be created in Hevy folder {hevy_folder_id}"
                ),
            ));
        }

        self.db
            .mark_routine_folder_pushed(folder.id, hevy_folder_id, &routine_ids)
            .await?;
        Ok(PushReport {
            folder_id: hevy_folder_id,
            routine_ids,
            failed,
        })
    }
}
