// ABOUTME: Profile route handlers for reading, updating, and deleting the caller's profile
// ABOUTME: Also records body weight and manages the encrypted Hevy API key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Profile routes

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::{authenticate, parse_json_body};
use crate::errors::AppError;
use crate::models::ProfileUpdate;
use crate::resources::ServerResources;

/// Body of `POST /api/profile/weight`
#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    /// Body weight in kilograms
    pub weight_kg: f64,
}

/// Body of `PUT /api/profile/hevy-key`
#[derive(Debug, Deserialize)]
pub struct HevyKeyRequest {
    /// Hevy API key
    pub api_key: String,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/profile",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/profile/weight", post(Self::handle_record_weight))
            .route(
                "/api/profile/hevy-key",
                put(Self::handle_set_hevy_key).delete(Self::handle_clear_hevy_key),
            )
            .with_state(resources)
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let update: ProfileUpdate = parse_json_body(&body)?;
        let updated = resources.database.update_profile(user.id, update).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        resources.database.delete_user(user.id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_record_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let body: WeightRequest = parse_json_body(&body)?;
        let updated = resources
            .database
            .record_weight(user.id, body.weight_kg)
            .await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    async fn handle_set_hevy_key(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let body: HevyKeyRequest = parse_json_body(&body)?;
        let api_key = body.api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::invalid_input("Hevy API key must not be empty"));
        }
        resources.database.set_hevy_api_key(user.id, api_key).await?;
        let updated = resources.database.get_user_required(user.id).await?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    async fn handle_clear_hevy_key(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        resources.database.clear_hevy_api_key(user.id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
