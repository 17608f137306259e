// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness always answers; readiness pings the database and reports the model endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for load balancers and orchestrators

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tracing::warn;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// `"ok"`, `"unavailable"`, or `"disabled"` when no generator is configured
    async fn llm_status(resources: &ServerResources) -> &'static str {
        let Some(generator) = &resources.generator else {
            return "disabled";
        };
        match generator.llm_available().await {
            Ok(true) => "ok",
            Ok(false) => "unavailable",
            Err(e) => {
                warn!(error = %e, "Model endpoint health check failed");
                "unavailable"
            }
        }
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        match resources.database.ping().await {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({
                    "status": "ready",
                    "exercises_indexed": resources.index.len().await,
                    "llm": Self::llm_status(&resources).await,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                })),
            ),
            Err(e) => {
                warn!(error = %e, "Readiness check failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "status": "unavailable",
                        "timestamp": chrono::Utc::now().to_rfc3339()
                    })),
                )
            }
        }
    }
}
