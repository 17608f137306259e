// ABOUTME: Registration and login route handlers
// ABOUTME: Creates accounts with bcrypt-hashed passwords and issues JWTs on success
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! These are the only `/api` endpoints that do not require a bearer token.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::parse_json_body;
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::models::UserProfile;
use crate::resources::ServerResources;

/// Body of `POST /api/auth/register`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Unique username
    pub username: String,
    /// Contact email
    pub email: String,
    /// Plain-text password, at least 8 characters
    pub password: String,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// Profile plus a freshly issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: UserProfile,
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create registration and login routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let body: RegisterRequest = parse_json_body(&body)?;
        let user = match resources
            .database
            .create_user(&body.username, &body.email, &body.password)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                AppLogger::log_auth_event(&body.username, "register", false);
                return Err(e);
            }
        };
        let token = resources.auth_manager.generate_token(&user)?;
        AppLogger::log_auth_event(&user.username, "register", true);

        Ok((StatusCode::CREATED, Json(AuthResponse { user, token })).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let body: LoginRequest = parse_json_body(&body)?;
        let Some(user) = resources
            .database
            .verify_credentials(&body.username, &body.password)
            .await?
        else {
            AppLogger::log_auth_event(&body.username, "login", false);
            return Err(AppError::auth_invalid("Invalid username or password"));
        };
        let token = resources.auth_manager.generate_token(&user)?;
        AppLogger::log_auth_event(&user.username, "login", true);

        Ok((StatusCode::OK, Json(AuthResponse { user, token })).into_response())
    }
}
