// ABOUTME: Retrieval-augmented routine generation
// ABOUTME: Retrieves candidate exercises and history, prompts the model, and assembles routine folders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::parse::parse_generated_routine;
use super::prompt::{build_routine_prompt, PromptContext, TRAINER_SYSTEM_PROMPT};
use super::split::{date_range, determine_workout_split, split_schedule};
use crate::catalog::{search_workout_history, ExerciseIndex, ScoredWorkout, SearchFilter};
use crate::config::LlmConfig;
use crate::constants::llm::ROUTINE_MAX_TOKENS;
use crate::constants::routines::{CANDIDATE_SEARCH_K, MAX_CANDIDATE_EXERCISES, SIMILAR_WORKOUTS};
use crate::database::Database;
use crate::embeddings::EmbeddingProvider;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;
use crate::models::{
    Exercise, GeneratedRoutine, Period, RoutineFolder, SplitPreference, SplitType, UserProfile,
};

/// A single-day routine request
#[derive(Debug, Clone, Deserialize)]
pub struct RoutineRequest {
    /// Weekday being planned
    pub day: String,
    /// Session focus
    pub focus: String,
    /// Split the day belongs to
    #[serde(default)]
    pub split: Option<SplitType>,
    /// Whether to include cardio
    #[serde(default)]
    pub include_cardio: bool,
    /// Extra instructions from the trainee
    #[serde(default)]
    pub additional_context: Option<String>,
}

/// A routine folder request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderRequest {
    /// `auto`, `full_body`, `upper_lower`, or `push_pull`; `auto` when absent
    #[serde(default)]
    pub split: Option<String>,
    /// Planning horizon
    #[serde(default)]
    pub period: Period,
    /// Whether every day includes cardio
    #[serde(default)]
    pub include_cardio: bool,
    /// Folder name; derived from the split when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Folder description; derived when absent
    #[serde(default)]
    pub description: Option<String>,
}

/// Drafts routines with the language model
pub struct RoutineGenerator {
    llm: Arc<dyn LlmProvider>,
    index: Arc<ExerciseIndex>,
    db: Database,
    embedder: Arc<dyn EmbeddingProvider>,
    model: String,
    temperature: f32,
}

impl RoutineGenerator {
    /// Create a generator
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        index: Arc<ExerciseIndex>,
        db: Database,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &LlmConfig,
    ) -> Self {
        Self {
            llm,
            index,
            db,
            embedder,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Candidate exercises for a session, unique by title
    async fn candidate_exercises(
        &self,
        user: &UserProfile,
        focus: &str,
    ) -> AppResult<Vec<Exercise>> {
        let filter = SearchFilter::for_owner(user.id);
        let query = format!("{focus} exercises for {} level", user.experience_level);

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for hit in self.index.search(&query, &filter, CANDIDATE_SEARCH_K).await? {
            if candidates.len() >= MAX_CANDIDATE_EXERCISES {
                break;
            }
            if seen.insert(hit.exercise.title.clone()) {
                candidates.push(hit.exercise);
            }
        }

        if let Some(goal) = user.primary_goal() {
            for hit in self
                .index
                .by_goal(goal.as_str(), MAX_CANDIDATE_EXERCISES, &filter)
                .await?
            {
                if candidates.len() >= MAX_CANDIDATE_EXERCISES {
                    break;
                }
                if seen.insert(hit.exercise.title.clone()) {
                    candidates.push(hit.exercise);
                }
            }
        }

        if !user.available_equipment.is_empty() {
            let usable: Vec<Exercise> = candidates
                .iter()
                .filter(|e| {
                    e.equipment.is_empty()
                        || user
                            .available_equipment
                            .iter()
                            .any(|owned| e.uses_equipment(owned))
                })
                .cloned()
                .collect();
            if usable.is_empty() {
                debug!("Equipment filter removed every candidate; keeping unfiltered list");
            } else {
                candidates = usable;
            }
        }

        Ok(candidates)
    }

    async fn similar_workouts(&self, user: &UserProfile, focus: &str) -> Vec<ScoredWorkout> {
        let query = format!("{focus} workout routine");
        match search_workout_history(
            &self.db,
            self.embedder.as_ref(),
            user.id,
            &query,
            SIMILAR_WORKOUTS,
        )
        .await
        {
            Ok(workouts) => workouts,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Workout history search failed");
                Vec::new()
            }
        }
    }

    /// Whether the model endpoint answers with the configured key
    ///
    /// # Errors
    ///
    /// Returns an external service error if the endpoint cannot be reached
    pub async fn llm_available(&self) -> AppResult<bool> {
        self.llm.health_check().await
    }

    /// Draft a single-day routine
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no exercises match, or an external
    /// service error if the model call fails or its reply is unusable
    pub async fn generate_routine(
        &self,
        user: &UserProfile,
        request: &RoutineRequest,
    ) -> AppResult<GeneratedRoutine> {
        let started = Instant::now();
        let candidates = self.candidate_exercises(user, &request.focus).await?;
        if candidates.is_empty() {
            return Err(AppError::not_found(format!(
                "Exercises for {}",
                request.focus
            )));
        }
        let similar = self.similar_workouts(user, &request.focus).await;

        let prompt = build_routine_prompt(&PromptContext {
            user,
            day: &request.day,
            focus: &request.focus,
            split: request.split,
            include_cardio: request.include_cardio,
            similar_workouts: &similar,
            exercises: &candidates,
            additional_context: request.additional_context.as_deref(),
        })?;

        let mut chat = ChatRequest::new(vec![
            ChatMessage::system(TRAINER_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ])
        .with_model(self.model.clone())
        .with_temperature(self.temperature)
        .with_max_tokens(ROUTINE_MAX_TOKENS);
        if self.llm.capabilities().supports_json_mode() {
            chat = chat.with_json_mode();
        }

        let response = self.llm.complete(&chat).await?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Routine completion usage"
            );
        }

        let candidate_names: HashMap<String, String> = candidates
            .iter()
            .map(|e| (e.id.clone(), e.title.clone()))
            .collect();
        let (_, catalog_names) = self.index.ids_and_names().await;
        let generated =
            parse_generated_routine(&response.content, &candidate_names, &catalog_names)?;

        AppLogger::log_generation_event(
            &user.id.to_string(),
            &request.focus,
            generated.routine.exercises.len(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(generated)
    }

    /// Plan, generate, and store a routine folder
    ///
    /// Days are generated one after another in schedule order. Days that
    /// fail are skipped; the folder needs at least one routine.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an unknown split, the last generation error
    /// when no day could be generated, or a database error
    pub async fn generate_routine_folder(
        &self,
        user: &UserProfile,
        request: &FolderRequest,
    ) -> AppResult<RoutineFolder> {
        let preference = request
            .split
            .as_deref()
            .map_or(Ok(SplitPreference::Auto), str::parse)?;
        let split = determine_workout_split(
            user.preferred_workout_days,
            user.experience_level,
            preference,
        )?;
        let schedule = split_schedule(split, user.preferred_workout_days);
        info!(
            user_id = %user.id,
            split = %split,
            days = schedule.len(),
            "Generating routine folder"
        );

        let mut routines = Vec::with_capacity(schedule.len());
        let mut last_error = None;
        for slot in &schedule {
            let day_request = RoutineRequest {
                day: slot.day.to_owned(),
                focus: slot.focus.to_owned(),
                split: Some(split),
                include_cardio: request.include_cardio,
                additional_context: None,
            };
            match self.generate_routine(user, &day_request).await {
                Ok(generated) => {
                    let mut routine = generated.routine;
                    routine.title = format!("{} - {}", slot.day, slot.focus);
                    if routine.notes.is_none() && !generated.routine_description.is_empty() {
                        routine.notes = Some(generated.routine_description);
                    }
                    routines.push(routine);
                }
                Err(e) => {
                    warn!(day = slot.day, error = %e, "Skipping day that failed to generate");
                    last_error = Some(e);
                }
            }
        }

        if routines.is_empty() {
            return Err(last_error
                .unwrap_or_else(|| AppError::internal("No training days were scheduled")));
        }

        let now = Utc::now();
        let range = date_range(request.period, now);
        let days_per_week = u8::try_from(routines.len()).unwrap_or(u8::MAX);
        let folder = RoutineFolder {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: request
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("{} ({range})", split.label())),
            description: request.description.clone().unwrap_or_else(|| {
                format!(
                    "{days_per_week}-day {} plan for the {} of {range}",
                    split.label(),
                    request.period
                )
            }),
            split_type: split,
            days_per_week,
            period: request.period,
            date_range: range,
            routines,
            hevy_folder_id: None,
            hevy_routine_ids: Vec::new(),
            created_at: now,
        };

        self.db.save_routine_folder(&folder).await?;
        info!(folder_id = %folder.id, routines = folder.routines.len(), "Routine folder saved");
        Ok(folder)
    }
}
