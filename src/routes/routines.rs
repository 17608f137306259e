// ABOUTME: Routine generation and routine folder route handlers
// ABOUTME: Generates single-day routines and whole folders, then lists, renders, and deletes folders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Routine routes
//!
//! Generation endpoints answer `CONFIG_ERROR` when no model API key is configured.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{authenticate, parse_json_body, parse_optional_json_body};
use crate::errors::AppError;
use crate::models::{GeneratedRoutine, RoutineFolder};
use crate::resources::ServerResources;
use crate::routines::{format_folder_markdown, format_routine_markdown, FolderRequest, RoutineRequest};
use crate::units::UnitSystem;

/// Query parameters for markdown rendering
#[derive(Debug, Deserialize, Default)]
pub struct MarkdownQuery {
    /// `metric` (default) or `imperial`
    pub units: Option<String>,
}

/// Response for single-day generation
#[derive(Debug, Serialize)]
pub struct GeneratedRoutineResponse {
    /// The model's routine
    #[serde(flatten)]
    pub generated: GeneratedRoutine,
    /// Metric markdown rendering
    pub markdown: String,
}

/// Response for listing folders
#[derive(Debug, Serialize)]
pub struct ListFoldersResponse {
    /// Folders, newest first
    pub folders: Vec<RoutineFolder>,
    /// Number of folders
    pub total: usize,
}

/// Routine routes handler
pub struct RoutineRoutes;

impl RoutineRoutes {
    /// Create all routine and routine folder routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/routines/generate", post(Self::handle_generate))
            .route(
                "/api/routine-folders",
                get(Self::handle_list_folders).post(Self::handle_create_folder),
            )
            .route(
                "/api/routine-folders/:id",
                get(Self::handle_get_folder).delete(Self::handle_delete_folder),
            )
            .route(
                "/api/routine-folders/:id/markdown",
                get(Self::handle_folder_markdown),
            )
            .with_state(resources)
    }

    async fn load_folder(
        resources: &ServerResources,
        user_id: Uuid,
        folder_id: Uuid,
    ) -> Result<RoutineFolder, AppError> {
        resources
            .database
            .get_routine_folder(user_id, folder_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Routine folder").with_resource_id(folder_id.to_string())
            })
    }

    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let request: RoutineRequest = parse_json_body(&body)?;
        if request.day.trim().is_empty() || request.focus.trim().is_empty() {
            return Err(AppError::invalid_input("Both 'day' and 'focus' are required"));
        }
        let generated = resources
            .generator()?
            .generate_routine(&user, &request)
            .await?;
        let markdown = format_routine_markdown(&generated.routine, UnitSystem::Metric);

        Ok((
            StatusCode::OK,
            Json(GeneratedRoutineResponse {
                generated,
                markdown,
            }),
        )
            .into_response())
    }

    async fn handle_create_folder(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let request: FolderRequest = parse_optional_json_body(&body)?;
        let folder = resources
            .generator()?
            .generate_routine_folder(&user, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(folder)).into_response())
    }

    async fn handle_list_folders(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let folders = resources.database.list_routine_folders(user.id).await?;
        let total = folders.len();
        Ok((StatusCode::OK, Json(ListFoldersResponse { folders, total })).into_response())
    }

    async fn handle_get_folder(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let folder = Self::load_folder(&resources, user.id, id).await?;
        Ok((StatusCode::OK, Json(folder)).into_response())
    }

    async fn handle_delete_folder(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        resources.database.delete_routine_folder(user.id, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_folder_markdown(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Query(query): Query<MarkdownQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let units = query
            .units
            .as_deref()
            .map_or(Ok(UnitSystem::Metric), str::parse)?;
        let folder = Self::load_folder(&resources, user.id, id).await?;

        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            format_folder_markdown(&folder, units),
        )
            .into_response())
    }
}
