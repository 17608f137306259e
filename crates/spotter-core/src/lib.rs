// ABOUTME: Core types and constants for the Spotter personal trainer platform
// ABOUTME: Foundation crate with error handling, domain models, units, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Spotter Core
//!
//! Foundation crate providing shared types for the Spotter platform. It is
//! designed to change infrequently so the rest of the workspace benefits from
//! incremental compilation.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Profiles, workouts, exercises, and routines
//! - **constants**: Defaults and domain vocabularies
//! - **units**: Metric/imperial conversions and display formatting

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (profiles, workouts, exercises, routines)
pub mod models;

/// Unit conversion and display helpers
pub mod units;
