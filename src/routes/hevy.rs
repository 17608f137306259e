// ABOUTME: Hevy integration route handlers
// ABOUTME: Triggers exercise and workout sync and pushes stored routine folders to Hevy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Hevy routes
//!
//! Both endpoints need a Hevy API key stored through `PUT /api/profile/hevy-key`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{authenticate, parse_optional_json_body};
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::{ExerciseSyncReport, SyncReport};

/// Body of `POST /api/hevy/sync`
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// Import workouts started after this instant instead of the last sync
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    /// Also refresh exercise templates
    #[serde(default = "default_true")]
    pub exercises: bool,
}

impl Default for SyncRequest {
    fn default() -> Self {
        Self {
            since: None,
            exercises: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Combined sync outcome
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// Exercise template sync, when requested
    pub exercises: Option<ExerciseSyncReport>,
    /// Workout sync
    pub workouts: SyncReport,
}

/// Hevy routes handler
pub struct HevyRoutes;

impl HevyRoutes {
    /// Create all Hevy routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/hevy/sync", post(Self::handle_sync))
            .route("/api/routine-folders/:id/push", post(Self::handle_push))
            .with_state(resources)
    }

    async fn handle_sync(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let request: SyncRequest = parse_optional_json_body(&body)?;

        let exercises = if request.exercises {
            Some(resources.sync.sync_exercises(&user).await?)
        } else {
            None
        };
        let workouts = resources.sync.sync_workouts(&user, request.since).await?;

        Ok((StatusCode::OK, Json(SyncResponse { exercises, workouts })).into_response())
    }

    async fn handle_push(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let report = resources.sync.push_routine_folder(&user, id).await?;
        Ok((StatusCode::OK, Json(report)).into_response())
    }
}
