// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, in-memory databases, test accounts, and fully wired server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `spotter`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::sync::{Arc, Once};

use anyhow::Result;
use spotter::{
    catalog::{ensure_catalog, ExerciseIndex},
    config::{
        DatabaseUrl, EmbeddingConfig, EmbeddingProviderType, Environment, HevyConfig,
        HttpClientConfig, LlmConfig, ServerConfig,
    },
    database::Database,
    embeddings::{EmbeddingProvider, HashingEmbeddingProvider},
    llm::{LlmProvider, OpenAiCompatibleProvider},
    models::UserProfile,
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Fixed AES key so stored Hevy keys decrypt across helpers
pub const TEST_ENCRYPTION_KEY: [u8; 32] = [7u8; 32];
/// Hevy key accepted by the mock Hevy server
pub const TEST_HEVY_KEY: &str = "test-hevy-key";
/// Password used for every test account
pub const TEST_PASSWORD: &str = "correct-horse-battery";
/// Dimension of the hashing embedder used in tests
pub const TEST_EMBEDDING_DIMENSION: usize = 256;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG raises the level for debugging a failing test
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:", TEST_ENCRYPTION_KEY).await?)
}

/// Create an account with the standard test password
pub async fn create_test_user(database: &Database, username: &str) -> Result<UserProfile> {
    Ok(database
        .create_user(username, &format!("{username}@example.com"), TEST_PASSWORD)
        .await?)
}

/// Hashing embedder shared by tests
pub fn test_embedder() -> Arc<dyn EmbeddingProvider> {
    Arc::new(HashingEmbeddingProvider::new(TEST_EMBEDDING_DIMENSION))
}

/// Configuration pointing at mock services
pub fn test_config(hevy_base_url: &str, llm_base_url: Option<&str>) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        host: "127.0.0.1".to_owned(),
        environment: Environment::Testing,
        database_url: DatabaseUrl::Memory,
        encryption_key: TEST_ENCRYPTION_KEY,
        jwt_secret: "test-jwt-secret-with-enough-length-for-hs256".to_owned(),
        jwt_expiry_hours: 24,
        llm: LlmConfig {
            api_key: llm_base_url.map(|_| "test-openai-key".to_owned()),
            base_url: llm_base_url.unwrap_or("http://127.0.0.1:9").to_owned(),
            model: "gpt-test".to_owned(),
            temperature: 0.7,
        },
        embeddings: EmbeddingConfig {
            provider: EmbeddingProviderType::Hashing,
            model: "text-embedding-3-small".to_owned(),
            dimension: TEST_EMBEDDING_DIMENSION,
        },
        hevy: HevyConfig {
            base_url: hevy_base_url.to_owned(),
        },
        http_client: HttpClientConfig {
            timeout_secs: 10,
            connect_timeout_secs: 5,
        },
        cors_origins: vec!["*".to_owned()],
    }
}

/// Database with the built-in catalog and an index over it
pub async fn create_indexed_database() -> Result<(Database, Arc<ExerciseIndex>)> {
    let database = create_test_database().await?;
    ensure_catalog(&database).await?;
    let index = ExerciseIndex::build(database.all_exercises().await?, test_embedder()).await?;
    Ok((database, Arc::new(index)))
}

/// Fully wired server resources; generation is enabled when `llm_base_url` is set
pub async fn create_test_resources(
    hevy_base_url: &str,
    llm_base_url: Option<&str>,
) -> Result<Arc<ServerResources>> {
    let config = test_config(hevy_base_url, llm_base_url);
    let (database, index) = create_indexed_database().await?;
    let llm: Option<Arc<dyn LlmProvider>> = match llm_base_url {
        Some(_) => Some(Arc::new(OpenAiCompatibleProvider::from_config(
            &config.llm,
            &config.http_client,
        )?)),
        None => None,
    };

    Ok(Arc::new(ServerResources::new(
        database,
        test_embedder(),
        index,
        llm,
        Arc::new(config),
    )))
}
