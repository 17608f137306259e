// ABOUTME: Shared server state handed to every route handler
// ABOUTME: Builds the database, embedder, exercise index, model provider, and services once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Expensive components are created once and shared behind `Arc`s so that
//! handlers never rebuild the index or reconnect to the database.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::AuthManager;
use crate::catalog::{ensure_catalog, ExerciseIndex};
use crate::config::ServerConfig;
use crate::database::Database;
use crate::embeddings::{build_embedder, EmbeddingProvider};
use crate::errors::{AppError, AppResult};
use crate::llm::{LlmProvider, OpenAiCompatibleProvider};
use crate::routines::RoutineGenerator;
use crate::services::HevySyncService;

/// Everything a request handler may need
pub struct ServerResources {
    /// Persistent stores
    pub database: Database,
    /// JWT issuing and validation
    pub auth_manager: Arc<AuthManager>,
    /// Cached embedding provider
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Exercise similarity index
    pub index: Arc<ExerciseIndex>,
    /// Routine generator; absent when no model API key is configured
    pub generator: Option<Arc<RoutineGenerator>>,
    /// Hevy synchronisation
    pub sync: Arc<HevySyncService>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from already-built parts
    #[must_use]
    pub fn new(
        database: Database,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<ExerciseIndex>,
        llm: Option<Arc<dyn LlmProvider>>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let auth_manager = Arc::new(AuthManager::new(
            config.jwt_secret.as_bytes(),
            config.jwt_expiry_hours,
        ));
        let generator = llm.map(|llm| {
            Arc::new(RoutineGenerator::new(
                llm,
                Arc::clone(&index),
                database.clone(),
                Arc::clone(&embedder),
                &config.llm,
            ))
        });
        let sync = Arc::new(HevySyncService::new(
            database.clone(),
            Arc::clone(&index),
            config.hevy.base_url.clone(),
        ));

        Self {
            database,
            auth_manager,
            embedder,
            index,
            generator,
            sync,
            config,
        }
    }

    /// Connect, migrate, seed the catalog, and build the index
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the embedder cannot
    /// be built, or indexing fails
    pub async fn initialize(config: ServerConfig) -> AppResult<Self> {
        spotter_hevy::initialize_shared_client(
            config.http_client.timeout_secs,
            config.http_client.connect_timeout_secs,
        );

        let database = Database::new(
            &config.database_url.to_connection_string(),
            config.encryption_key,
        )
        .await?;
        let seeded = ensure_catalog(&database).await?;
        if seeded > 0 {
            info!(seeded, "Built-in exercise catalog stored");
        }

        let embedder = build_embedder(&config, database.clone())?;
        let exercises = database.all_exercises().await?;
        let index = Arc::new(ExerciseIndex::build(exercises, Arc::clone(&embedder)).await?);

        let llm: Option<Arc<dyn LlmProvider>> = if config.llm.api_key.is_some() {
            Some(Arc::new(OpenAiCompatibleProvider::from_config(
                &config.llm,
                &config.http_client,
            )?))
        } else {
            warn!("OPENAI_API_KEY not set; routine generation is disabled");
            None
        };

        Ok(Self::new(database, embedder, index, llm, Arc::new(config)))
    }

    /// The routine generator
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` when no model API key is configured
    pub fn generator(&self) -> AppResult<&RoutineGenerator> {
        self.generator
            .as_deref()
            .ok_or_else(|| AppError::config("OPENAI_API_KEY is not configured"))
    }
}
