// ABOUTME: HTTP server assembly for the Spotter REST API
// ABOUTME: Merges every route group, applies tower-http layers, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # HTTP Server
//!
//! Layers, innermost first: request tracing, request timeout, body size limit, CORS.

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, Span};

use crate::constants::network::{MAX_REQUEST_BODY_BYTES, REQUEST_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};
use crate::middleware::{create_request_span, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{
    AuthRoutes, ExerciseRoutes, HealthRoutes, HevyRoutes, ProfileRoutes, RoutineRoutes,
    WorkoutRoutes,
};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors_origins);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(&resources)))
        .merge(ExerciseRoutes::routes(Arc::clone(&resources)))
        .merge(RoutineRoutes::routes(Arc::clone(&resources)))
        .merge(HevyRoutes::routes(resources))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| create_request_span(request))
                .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    span.record("duration_ms", latency.as_millis() as u64);
                    info!("request completed");
                }),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
}

/// Bind the configured address and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = format!(
        "{}:{}",
        resources.config.host, resources.config.http_port
    );
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Spotter listening on http://{addr}");

    axum::serve(listener, build_router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
