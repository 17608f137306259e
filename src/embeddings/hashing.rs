// ABOUTME: Deterministic offline embedder based on signed feature hashing
// ABOUTME: Hashes word unigrams, word bigrams, and character trigrams into a fixed-size vector
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::EmbeddingProvider;
use crate::constants::embeddings::HASHING_MODEL;
use crate::errors::AppResult;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.75;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Embeds text without any network calls
///
/// Similar wording lands on similar buckets, which is enough to rank muscle
/// and equipment vocabulary sensibly when no hosted model is configured.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimension: usize,
    model: String,
}

impl HashingEmbeddingProvider {
    /// Create an embedder producing vectors of `dimension` floats
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model: format!("{HASHING_MODEL}-{dimension}"),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }

    /// Embed synchronously
    #[must_use]
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let tokens = Self::tokenize(text);

        for token in &tokens {
            self.add_feature(&mut vector, &format!("w:{token}"), UNIGRAM_WEIGHT);

            let padded: Vec<char> = format!("#{token}#").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, &format!("c:{trigram}"), TRIGRAM_WEIGHT);
            }
        }
        for pair in tokens.windows(2) {
            self.add_feature(
                &mut vector,
                &format!("b:{}_{}", pair[0], pair[1]),
                BIGRAM_WEIGHT,
            );
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashing"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::cosine_similarity;

    #[test]
    fn test_deterministic_and_normalized() {
        let embedder = HashingEmbeddingProvider::new(128);
        let a = embedder.embed_text("Barbell Bench Press");
        let b = embedder.embed_text("barbell bench press");

        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_related_text_scores_higher() {
        let embedder = HashingEmbeddingProvider::new(384);
        let query = embedder.embed_text("Primary muscles: chest");
        let chest = embedder.embed_text("Bench Press - Primary muscles: chest, pectorals");
        let legs = embedder.embed_text("Squat - Primary muscles: quadriceps, legs");

        assert!(cosine_similarity(&query, &chest) > cosine_similarity(&query, &legs));
    }

    #[test]
    fn test_model_id_tracks_dimension() {
        assert_eq!(HashingEmbeddingProvider::new(384).model(), "feature-hashing-v1-384");
        assert_ne!(
            HashingEmbeddingProvider::new(128).model(),
            HashingEmbeddingProvider::new(384).model()
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbeddingProvider::new(16);
        assert!(embedder.embed_text("  ").iter().all(|v| v.abs() < f32::EPSILON));
    }
}
