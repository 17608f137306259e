// ABOUTME: Workout history route handlers
// ABOUTME: Lists, records, deletes, aggregates, and semantically searches a user's workouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout routes
//!
//! Workouts are always scoped to the authenticated user; another user's
//! workout id behaves as if it did not exist.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{authenticate, parse_json_body};
use crate::catalog::{search_workout_history, ScoredWorkout};
use crate::constants::pagination::{DEFAULT_LIMIT, DEFAULT_SEARCH_K, MAX_LIMIT, MAX_SEARCH_K};
use crate::errors::AppError;
use crate::models::{ProgressionEntry, Workout, WorkoutExercise};
use crate::resources::ServerResources;

/// Query parameters for listing workouts
#[derive(Debug, Deserialize, Default)]
pub struct ListWorkoutsQuery {
    /// Page size
    pub limit: Option<u32>,
    /// Rows to skip
    pub offset: Option<u32>,
}

/// Query parameters for workout statistics
#[derive(Debug, Deserialize, Default)]
pub struct StatsQuery {
    /// Inclusive lower bound on start time
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start time
    pub end: Option<DateTime<Utc>>,
}

/// Query parameters for history search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text description of the session
    pub q: String,
    /// Number of workouts to return
    pub k: Option<usize>,
}

/// Body of `POST /api/workouts`
#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
    /// Session title
    pub title: String,
    /// Session description
    #[serde(default)]
    pub description: Option<String>,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: DateTime<Utc>,
    /// Exercises performed
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

/// Response for listing workouts
#[derive(Debug, Serialize)]
pub struct ListWorkoutsResponse {
    /// Workouts, newest first
    pub workouts: Vec<Workout>,
    /// Page size used
    pub limit: u32,
    /// Offset used
    pub offset: u32,
}

/// Response for a progression lookup
#[derive(Debug, Serialize)]
pub struct ProgressionResponse {
    /// Exercise template id
    pub exercise_template_id: String,
    /// Chronological entries
    pub entries: Vec<ProgressionEntry>,
}

/// Response for a history search
#[derive(Debug, Serialize)]
pub struct SearchWorkoutsResponse {
    /// The query as received
    pub query: String,
    /// Matches, most similar first
    pub results: Vec<ScoredWorkout>,
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/workouts",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/workouts/stats", get(Self::handle_stats))
            .route("/api/workouts/search", get(Self::handle_search))
            .route(
                "/api/workouts/progression/:template_id",
                get(Self::handle_progression),
            )
            .route(
                "/api/workouts/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = query.offset.unwrap_or(0);
        let workouts = resources
            .database
            .list_workouts(user.id, limit, offset)
            .await?;

        Ok((
            StatusCode::OK,
            Json(ListWorkoutsResponse {
                workouts,
                limit,
                offset,
            }),
        )
            .into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let body: CreateWorkoutRequest = parse_json_body(&body)?;
        let title = body.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Workout title must not be empty"));
        }
        if body.end_time < body.start_time {
            return Err(AppError::invalid_input(
                "Workout end_time must not be before start_time",
            ));
        }

        let mut workout = Workout::new(user.id, title, body.start_time, body.end_time);
        workout.description = body.description;
        workout.exercises = body
            .exercises
            .into_iter()
            .enumerate()
            .map(|(i, mut exercise)| {
                exercise.index = u32::try_from(i).unwrap_or(u32::MAX);
                exercise
            })
            .collect();
        resources.database.save_workout(&workout).await?;

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let workout = resources
            .database
            .get_workout(user.id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout").with_resource_id(id.to_string()))?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        resources.database.delete_workout(user.id, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<StatsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        if let (Some(start), Some(end)) = (query.start, query.end) {
            if end < start {
                return Err(AppError::invalid_input("end must not be before start"));
            }
        }
        let stats = resources
            .database
            .workout_stats(user.id, query.start, query.end)
            .await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    async fn handle_progression(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(template_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let entries = resources
            .database
            .exercise_progression(user.id, &template_id)
            .await?;
        Ok((
            StatusCode::OK,
            Json(ProgressionResponse {
                exercise_template_id: template_id,
                entries,
            }),
        )
            .into_response())
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SearchQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        if query.q.trim().is_empty() {
            return Err(AppError::invalid_input("Query parameter 'q' must not be empty"));
        }
        let k = query.k.unwrap_or(DEFAULT_SEARCH_K).min(MAX_SEARCH_K);
        let results = search_workout_history(
            &resources.database,
            resources.embedder.as_ref(),
            user.id,
            &query.q,
            k,
        )
        .await?;

        Ok((
            StatusCode::OK,
            Json(SearchWorkoutsResponse {
                query: query.q,
                results,
            }),
        )
            .into_response())
    }
}
