// ABOUTME: Exercise catalog route handlers
// ABOUTME: Semantic search, goal-based lookup, and retrieval by Hevy template id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise routes
//!
//! Results include the shared catalog plus the caller's own custom exercises.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::authenticate;
use crate::catalog::{ScoredExercise, SearchFilter};
use crate::constants::pagination::{DEFAULT_SEARCH_K, MAX_SEARCH_K};
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Query parameters for catalog search
#[derive(Debug, Deserialize)]
pub struct ExerciseSearchQuery {
    /// Free-text query, e.g. `legs` or `Primary muscles: chest`
    pub q: String,
    /// Restrict to one equipment type
    pub equipment: Option<String>,
    /// Number of results
    pub k: Option<usize>,
}

/// Query parameters for goal lookup
#[derive(Debug, Deserialize, Default)]
pub struct GoalQuery {
    /// Number of results
    pub limit: Option<usize>,
    /// Restrict to one equipment type
    pub equipment: Option<String>,
}

/// Response for search and goal lookups
#[derive(Debug, Serialize)]
pub struct ExerciseSearchResponse {
    /// Query or goal that produced the results
    pub query: String,
    /// Matches, most similar first
    pub results: Vec<ScoredExercise>,
}

/// Exercise routes handler
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create all exercise routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/exercises/search", get(Self::handle_search))
            .route("/api/exercises/by-goal/:goal", get(Self::handle_by_goal))
            .route("/api/exercises/:id", get(Self::handle_get))
            .with_state(resources)
    }

    fn filter_for(user_id: uuid::Uuid, equipment: Option<String>) -> SearchFilter {
        let filter = SearchFilter::for_owner(user_id);
        match equipment.filter(|e| !e.trim().is_empty()) {
            Some(equipment) => filter.with_equipment(equipment),
            None => filter,
        }
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ExerciseSearchQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        if query.q.trim().is_empty() {
            return Err(AppError::invalid_input("Query parameter 'q' must not be empty"));
        }
        let k = query.k.unwrap_or(DEFAULT_SEARCH_K).min(MAX_SEARCH_K);
        let filter = Self::filter_for(user.id, query.equipment);
        let results = resources.index.search(&query.q, &filter, k).await?;

        Ok((
            StatusCode::OK,
            Json(ExerciseSearchResponse {
                query: query.q,
                results,
            }),
        )
            .into_response())
    }

    async fn handle_by_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(goal): Path<String>,
        Query(query): Query<GoalQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_K).min(MAX_SEARCH_K);
        let filter = Self::filter_for(user.id, query.equipment);
        let results = resources.index.by_goal(&goal, limit, &filter).await?;

        Ok((
            StatusCode::OK,
            Json(ExerciseSearchResponse {
                query: goal,
                results,
            }),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let exercise = resources
            .index
            .get(&id)
            .await
            .filter(|e| SearchFilter::for_owner(user.id).matches(e))
            .ok_or_else(|| AppError::not_found("Exercise").with_resource_id(id))?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }
}
