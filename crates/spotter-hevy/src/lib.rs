// ABOUTME: Hevy workout tracker API client for pulling workouts and pushing routines
// ABOUTME: Wire types, domain conversions, and a pooled HTTP client with Hevy error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Spotter Hevy
//!
//! Client for the public Hevy API (`https://api.hevyapp.com/v1`). Requests are
//! authenticated with the `api-key` header.
//!
//! - [`HevyClient`]: workouts, routines, routine folders, and exercise templates
//! - [`models`]: Hevy's JSON schema
//! - [`convert`]: translation between Hevy payloads and Spotter domain models

/// Domain model conversions
pub mod convert;
/// Hevy API client
pub mod client;
/// Shared HTTP client for Hevy API calls
pub mod http_client;
/// Hevy wire types
pub mod models;

pub use client::{HevyClient, DEFAULT_BASE_URL};
pub use http_client::{initialize_shared_client, shared_client};
