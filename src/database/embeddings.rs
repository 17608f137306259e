// ABOUTME: Persistent embedding cache keyed by content hash
// ABOUTME: Stores vectors as little-endian f32 blobs so restarts skip re-embedding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::Row;

use super::{encode_timestamp, Database};
use crate::errors::{AppError, AppResult};

fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn blob_to_vector(blob: &[u8]) -> AppResult<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(AppError::database(format!(
            "Embedding blob length {} is not a multiple of 4",
            blob.len()
        )));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

impl Database {
    pub(super) async fn migrate_embedding_cache(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS embedding_cache (
                cache_key TEXT PRIMARY KEY,
                model TEXT NOT NULL,
                dimension INTEGER NOT NULL,
                vector BLOB NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create embedding_cache table: {e}")))?;
        Ok(())
    }

    /// Look up a cached embedding
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored blob is corrupt
    pub async fn cached_embedding(&self, cache_key: &str) -> AppResult<Option<Vec<f32>>> {
        let row = sqlx::query("SELECT vector FROM embedding_cache WHERE cache_key = $1")
            .bind(cache_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to read embedding cache: {e}")))?;

        row.map(|row| {
            let blob: Vec<u8> = row.get("vector");
            blob_to_vector(&blob)
        })
        .transpose()
    }

    /// Store an embedding, replacing any previous value for the key
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn store_embedding(
        &self,
        cache_key: &str,
        model: &str,
        vector: &[f32],
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO embedding_cache (cache_key, model, dimension, vector, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(cache_key) DO UPDATE SET
                model = excluded.model,
                dimension = excluded.dimension,
                vector = excluded.vector,
                created_at = excluded.created_at
            ",
        )
        .bind(cache_key)
        .bind(model)
        .bind(vector.len() as i64)
        .bind(vector_to_blob(vector))
        .bind(encode_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to write embedding cache: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_layout_is_little_endian() {
        let blob = vector_to_blob(&[1.0, -0.5]);
        assert_eq!(blob.len(), 8);
        assert_eq!(&blob[..4], &1.0f32.to_le_bytes());
        assert_eq!(blob_to_vector(&blob).unwrap(), vec![1.0, -0.5]);
    }

    #[test]
    fn test_truncated_blob_rejected() {
        assert!(blob_to_vector(&[0, 0, 128]).is_err());
    }
}
