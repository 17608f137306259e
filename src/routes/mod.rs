// ABOUTME: Route module organization for the Spotter REST API
// ABOUTME: Groups handlers by domain and provides the shared bearer-token authentication helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Spotter REST API
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the stores, the exercise index, the generator, or the sync service.
//! Every `/api` route except `/api/auth/*` requires `Authorization: Bearer <jwt>`.

/// Registration and login
pub mod auth;
/// Catalog search and lookup
pub mod exercises;
/// Liveness and readiness
pub mod health;
/// Hevy synchronisation
pub mod hevy;
/// Profile management
pub mod profile;
/// Routine generation and routine folders
pub mod routines;
/// Workout history
pub mod workouts;

pub use auth::{AuthRoutes, AuthResponse, LoginRequest, RegisterRequest};
pub use exercises::ExerciseRoutes;
pub use health::HealthRoutes;
pub use hevy::HevyRoutes;
pub use profile::ProfileRoutes;
pub use routines::RoutineRoutes;
pub use workouts::WorkoutRoutes;

use axum::body::Bytes;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::de::DeserializeOwned;

use crate::constants::auth::BEARER_PREFIX;
use crate::errors::{AppError, AppResult};
use crate::models::UserProfile;
use crate::resources::ServerResources;

/// Resolve the bearer token in `headers` to the calling user
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` without a token, `AUTH_EXPIRED` or `AUTH_INVALID`
/// for a rejected token, and `AUTH_INVALID` if the user no longer exists
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<UserProfile> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(AppError::auth_required)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Authorization header must use the Bearer scheme"))?;

    let claims = resources.auth_manager.validate_token(token)?;
    let user_id = claims.user_id()?;
    resources
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Account no longer exists"))
}

/// Decode a JSON request body
///
/// Handlers take the raw body and call this after `authenticate`, so a
/// malformed body never outranks a missing token.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the body is not valid JSON for `T`
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_input(format!("Invalid request body: {e}")))
}

/// Decode an optional JSON request body, using `T::default()` when it is empty
///
/// # Errors
///
/// Returns `INVALID_INPUT` if a non-empty body is not valid JSON for `T`
pub(crate) fn parse_optional_json_body<T: DeserializeOwned + Default>(
    body: &Bytes,
) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_json_body(body)
}
