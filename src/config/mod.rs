// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the Spotter server, loaded exclusively from environment variables.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DatabaseUrl, EmbeddingConfig, EmbeddingProviderType, Environment, HevyConfig,
    HttpClientConfig, LlmConfig, ServerConfig,
};
