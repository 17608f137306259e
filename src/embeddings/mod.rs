// ABOUTME: Text embedding providers used by the exercise index and workout history search
// ABOUTME: Defines the provider trait, cosine similarity, and construction from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Embeddings
//!
//! - [`OpenAiEmbeddingProvider`]: hosted `OpenAI` embeddings with batching and retries
//! - [`HashingEmbeddingProvider`]: deterministic offline embedder for tests and keyless setups
//! - [`CachedEmbeddingProvider`]: wraps either one with the database embedding cache

mod cached;
mod hashing;
mod openai;

pub use cached::{cache_key, CachedEmbeddingProvider};
pub use hashing::HashingEmbeddingProvider;
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EmbeddingProviderType, ServerConfig};
use crate::database::Database;
use crate::errors::{AppError, AppResult};

/// Turns text into fixed-length vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider identifier for logs
    fn name(&self) -> &'static str;

    /// Model identifier; part of every cache key
    fn model(&self) -> &str;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;

    /// Embed many texts; output order matches input order
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        self.embed_batch(&[text.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal(format!("{} returned no embedding", self.name())))
    }
}

/// Cosine similarity; `0.0` for mismatched lengths or zero vectors
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (x.mul_add(*y, dot), x.mul_add(*x, na), y.mul_add(*y, nb))
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Build the configured provider wrapped in the database cache
///
/// # Errors
///
/// Returns an error if the `OpenAI` provider is selected but cannot be built
pub fn build_embedder(config: &ServerConfig, db: Database) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let inner: Arc<dyn EmbeddingProvider> = match config.embeddings.provider {
        EmbeddingProviderType::OpenAi => Arc::new(OpenAiEmbeddingProvider::from_config(
            &config.llm,
            &config.embeddings,
            &config.http_client,
        )?),
        EmbeddingProviderType::Hashing => {
            Arc::new(HashingEmbeddingProvider::new(config.embeddings.dimension))
        }
    };

    tracing::info!(
        provider = inner.name(),
        model = inner.model(),
        dimension = inner.dimension(),
        "Embedding provider ready"
    );
    Ok(Arc::new(CachedEmbeddingProvider::new(inner, db)))
}
