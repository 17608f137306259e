// ABOUTME: Embedding provider decorator backed by an in-memory LRU and the database cache
// ABOUTME: Only texts missing from both layers are sent to the wrapped provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::debug;

use super::EmbeddingProvider;
use crate::constants::embeddings::MEMORY_CACHE_CAPACITY;
use crate::database::Database;
use crate::errors::{AppError, AppResult};

/// Cache key for a text under a model: hex sha256 of `"{model}\n{text}"`
#[must_use]
pub fn cache_key(model: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update(b"\n");
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Wraps a provider with memory and database caching
pub struct CachedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    db: Database,
    memory: Mutex<LruCache<String, Vec<f32>>>,
}

impl CachedEmbeddingProvider {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(MEMORY_CACHE_CAPACITY) {
        Some(capacity) => capacity,
        None => NonZeroUsize::MIN,
    };

    /// Wrap `inner` with the cache stored in `db`
    #[must_use]
    pub fn new(inner: Arc<dyn EmbeddingProvider>, db: Database) -> Self {
        Self {
            inner,
            db,
            memory: Mutex::new(LruCache::new(Self::DEFAULT_CAPACITY)),
        }
    }

    /// Cached vector for `key`; entries of the wrong length count as misses
    async fn lookup(&self, key: &str) -> AppResult<Option<Vec<f32>>> {
        let dimension = self.inner.dimension();
        if let Some(hit) = self.memory.lock().await.get(key) {
            if hit.len() == dimension {
                return Ok(Some(hit.clone()));
            }
        }
        let Some(stored) = self.db.cached_embedding(key).await? else {
            return Ok(None);
        };
        if stored.len() != dimension {
            debug!(
                expected = dimension,
                cached = stored.len(),
                "Ignoring cached embedding with stale dimension"
            );
            return Ok(None);
        }
        self.memory.lock().await.put(key.to_owned(), stored.clone());
        Ok(Some(stored))
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbeddingProvider {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let model = self.inner.model().to_owned();
        let keys: Vec<String> = texts.iter().map(|t| cache_key(&model, t)).collect();

        let mut resolved: HashMap<String, Vec<f32>> = HashMap::new();
        let mut misses: Vec<(String, String)> = Vec::new();
        for (key, text) in keys.iter().zip(texts) {
            if resolved.contains_key(key) || misses.iter().any(|(k, _)| k == key) {
                continue;
            }
            match self.lookup(key).await? {
                Some(vector) => {
                    resolved.insert(key.clone(), vector);
                }
                None => misses.push((key.clone(), text.clone())),
            }
        }

        debug!(
            requested = texts.len(),
            misses = misses.len(),
            "Embedding cache lookup"
        );

        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|(_, t)| t.clone()).collect();
            let vectors = self.inner.embed_batch(&miss_texts).await?;
            if vectors.len() != misses.len() {
                return Err(AppError::internal(format!(
                    "{} returned {} embeddings for {} texts",
                    self.inner.name(),
                    vectors.len(),
                    misses.len()
                )));
            }

            for ((key, _), vector) in misses.iter().zip(&vectors) {
                self.db.store_embedding(key, &model, vector).await?;
            }

            let mut memory = self.memory.lock().await;
            for ((key, _), vector) in misses.into_iter().zip(vectors) {
                memory.put(key.clone(), vector.clone());
                resolved.insert(key, vector);
            }
        }

        keys.iter()
            .map(|key| {
                resolved
                    .get(key)
                    .cloned()
                    .ok_or_else(|| AppError::internal("Embedding missing after cache fill"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_depends_on_model() {
        let a = cache_key("model-a", "squat");
        let b = cache_key("model-b", "squat");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a, cache_key("model-a", "squat"));
    }
}
