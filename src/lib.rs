// ABOUTME: Main library entry point for the Spotter personal trainer service
// ABOUTME: Wires storage, similarity search, routine generation, Hevy sync, and the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Spotter
//!
//! A personal-trainer service. Spotter keeps user fitness profiles and workout
//! history, retrieves candidate exercises by semantic similarity, and asks a
//! hosted language model to draft routines that can be pushed to Hevy.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` stores for profiles, workouts, exercises, routine folders
//! - **Embeddings / Catalog**: embedding providers and the in-process exercise index
//! - **LLM**: OpenAI-compatible chat completion provider
//! - **Routines**: split planning, prompt construction, response parsing
//! - **Services**: Hevy synchronisation
//! - **Routes**: axum REST API
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use spotter::config::environment::ServerConfig;
//! use spotter::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Spotter configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT issuing and validation
pub mod auth;

/// Exercise similarity index, built-in catalog, and workout history search
pub mod catalog;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// Password hashing and API key encryption
pub mod crypto;

/// `SQLite` persistence
pub mod database;

/// Text embedding providers
pub mod embeddings;

/// Unified error handling (re-exported from `spotter-core`)
pub mod errors;

/// Language model provider abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// CORS and request tracing layers
pub mod middleware;

/// Shared server state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Routine planning, generation, and formatting
pub mod routines;

/// HTTP server assembly
pub mod server;

/// Background and orchestration services
pub mod services;

pub use spotter_core::models;
pub use spotter_core::units;
