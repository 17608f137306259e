// ABOUTME: HTTP middleware for cross-origin access and request tracing
// ABOUTME: Builds the tower-http layers wrapped around every Spotter route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cross-origin resource sharing
pub mod cors;
/// Request spans with correlation ids
pub mod tracing;

pub use cors::setup_cors;
pub use tracing::{create_request_span, request_id, REQUEST_ID_HEADER};
