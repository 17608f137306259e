// ABOUTME: Domain service layer for work that spans stores and external APIs
// ABOUTME: Hosts the Hevy synchronisation service shared by the REST API and the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services hold business logic that route handlers and CLI commands share,
//! so both entry points apply the same rules.

/// Hevy exercise, workout, and routine folder synchronisation
pub mod sync;

pub use sync::{ExerciseSyncReport, HevySyncService, PushReport, SyncReport};
