// ABOUTME: OpenAI embeddings API client with batching and retry on transient failures
// ABOUTME: Splits large inputs into batches and restores input order from response indexes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::EmbeddingProvider;
use crate::config::{EmbeddingConfig, HttpClientConfig, LlmConfig};
use crate::constants::embeddings::{INITIAL_BACKOFF_MS, MAX_ATTEMPTS, MAX_BATCH_SIZE};
use crate::errors::{AppError, AppResult};

const SERVICE_NAME: &str = "OpenAI embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: String,
}

/// Settings for [`OpenAiEmbeddingProvider`]
#[derive(Clone)]
pub struct OpenAiEmbeddingConfig {
    /// Bearer API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Embedding model
    pub model: String,
    /// Vector length for models this client does not know
    pub dimension: usize,
    /// Inputs per request
    pub batch_size: usize,
    /// Attempts per request, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each retry
    pub initial_backoff: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for OpenAiEmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Hosted `OpenAI` embeddings
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    client: Client,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` for an empty API key, or an error if the HTTP
    /// client cannot be created
    pub fn new(config: OpenAiEmbeddingConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::config(
                "OpenAI API key is required for OpenAI embeddings. Set OPENAI_API_KEY.",
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create a provider from server configuration
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` if no API key is configured
    pub fn from_config(
        llm: &LlmConfig,
        embeddings: &EmbeddingConfig,
        http: &HttpClientConfig,
    ) -> AppResult<Self> {
        Self::new(OpenAiEmbeddingConfig {
            api_key: llm.api_key.clone().unwrap_or_default(),
            base_url: llm.base_url.clone(),
            model: embeddings.model.clone(),
            dimension: embeddings.dimension,
            batch_size: MAX_BATCH_SIZE,
            max_attempts: MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            timeout: Duration::from_secs(http.timeout_secs),
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
        })
    }

    fn api_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    fn is_transient(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn status_error(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ApiError>(body)
            .map_or_else(|_| format!("HTTP {status}"), |e| e.error.message);
        match status.as_u16() {
            401 | 403 => AppError::external_auth_failed(SERVICE_NAME, message),
            429 => AppError::external_rate_limited(SERVICE_NAME, message),
            500..=599 => AppError::external_unavailable(SERVICE_NAME, message),
            _ => AppError::external_service(SERVICE_NAME, message),
        }
    }

    /// One request, retried with exponential backoff on 429, 5xx, and connection failures
    async fn call_api(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            encoding_format: "float",
        };

        let attempts = self.config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.config.initial_backoff * 2u32.pow(attempt - 1);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying OpenAI embeddings request"
                );
                tokio::time::sleep(delay).await;
            }

            let result = self
                .client
                .post(self.api_url())
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .json(&request)
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(AppError::external_unavailable(
                        SERVICE_NAME,
                        format!("Request failed: {e}"),
                    ));
                    continue;
                }
                Err(e) => {
                    return Err(AppError::external_service(
                        SERVICE_NAME,
                        format!("Request failed: {e}"),
                    ))
                }
            };

            let status = response.status();
            if status.is_success() {
                let mut parsed: EmbeddingResponse = response.json().await.map_err(|e| {
                    AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
                })?;
                if parsed.data.len() != texts.len() {
                    return Err(AppError::external_service(
                        SERVICE_NAME,
                        format!(
                            "Expected {} embeddings, received {}",
                            texts.len(),
                            parsed.data.len()
                        ),
                    ));
                }
                parsed.data.sort_by_key(|item| item.index);
                return Ok(parsed.data.into_iter().map(|d| d.embedding).collect());
            }

            let body = response.text().await.unwrap_or_default();
            let error = Self::status_error(status, &body);
            if !Self::is_transient(status) {
                return Err(error);
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::external_service(SERVICE_NAME, "All retry attempts failed")
        }))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        match self.config.model.as_str() {
            "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
            "text-embedding-3-large" => 3072,
            _ => self.config.dimension,
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            debug!("Embedding batch of {} texts", chunk.len());
            embeddings.extend(self.call_api(chunk).await?);
        }

        info!(count = embeddings.len(), model = %self.config.model, "Generated embeddings");
        Ok(embeddings)
    }
}
