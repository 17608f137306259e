// ABOUTME: OpenAI-compatible chat completions provider used for routine generation
// ABOUTME: Supports JSON mode, bearer auth, and maps HTTP failures onto AppError codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Talks to `POST {base_url}/chat/completions`. The default base URL is the
//! hosted `OpenAI` API, but any compatible endpoint works.
//!
//! ## Configuration
//!
//! Built from [`LlmConfig`], which reads:
//! - `OPENAI_API_KEY`: API key (required for the hosted API)
//! - `OPENAI_BASE_URL`: Base URL (default: <https://api.openai.com/v1>)
//! - `OPENAI_MODEL`: Model to use (default: `gpt-4-turbo-preview`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::config::{HttpClientConfig, LlmConfig};
use crate::errors::{AppError, ErrorCode};

const SERVICE_NAME: &str = "OpenAI";

/// Characters of an unparseable error body kept in the error message
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Completions for a whole routine can take a while
const COMPLETION_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Bearer API key
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Capabilities of this endpoint
    pub capabilities: LlmCapabilities,
    /// Connect timeout
    pub connect_timeout_secs: u64,
    /// Request timeout
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Chat completions over the `OpenAI` wire format
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from server configuration
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` if no API key is configured, or an error if the
    /// HTTP client cannot be created.
    pub fn from_config(llm: &LlmConfig, http: &HttpClientConfig) -> Result<Self, AppError> {
        let api_key = llm
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config("OPENAI_API_KEY is not configured"))?;

        let config = OpenAiCompatibleConfig {
            base_url: llm.base_url.clone(),
            api_key: Some(api_key),
            default_model: llm.model.clone(),
            capabilities: LlmCapabilities::openai(),
            connect_timeout_secs: http.connect_timeout_secs,
            timeout_secs: http.timeout_secs.max(COMPLETION_TIMEOUT_SECS),
        };

        info!(
            "Initializing OpenAI-compatible provider: base_url={}, model={}",
            config.base_url, config.default_model
        );

        Self::new(config)
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Parse error response from API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let message = error_response.error.message;
            match status.as_u16() {
                401 => AppError::external_auth_failed(
                    SERVICE_NAME,
                    format!("API authentication failed: {message}"),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    Self::extract_rate_limit_message(&message),
                ),
                400 => AppError::invalid_input(format!("API validation error: {message}")),
                404 => AppError::not_found(format!("Model or endpoint ({message})")),
                503 => AppError::external_unavailable(
                    SERVICE_NAME,
                    format!("Service unavailable: {message}"),
                ),
                _ => AppError::external_service(
                    SERVICE_NAME,
                    format!(
                        "{} - {message}",
                        error_response
                            .error
                            .error_type
                            .unwrap_or_else(|| "unknown".to_owned())
                    ),
                ),
            }
        } else {
            match status.as_u16() {
                401 => AppError::external_auth_failed(SERVICE_NAME, "API authentication failed"),
                429 => AppError::external_rate_limited(SERVICE_NAME, "Rate limit reached"),
                502..=504 => {
                    AppError::external_unavailable(SERVICE_NAME, "Server is not responding")
                }
                _ => AppError::external_service(
                    SERVICE_NAME,
                    format!(
                        "API error ({status}): {}",
                        body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Turn `OpenAI`'s "try again in 20s" hint into a client-facing message
    fn extract_rate_limit_message(message: &str) -> String {
        let lower = message.to_lowercase();
        if let Some(retry_pos) = lower.find("try again in ") {
            let after_prefix = &lower[retry_pos + "try again in ".len()..];
            if let Some(end_pos) = after_prefix.find(|c: char| !c.is_ascii_digit() && c != '.') {
                if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
                    let seconds_int = seconds.ceil() as u64;
                    return format!(
                        "LLM rate limit reached. Please try again in {seconds_int} seconds."
                    );
                }
            }
        }
        "LLM rate limit reached. Please wait a moment and try again.".to_owned()
    }

    fn send_error(&self, e: &reqwest::Error) -> AppError {
        error!("Failed to send request to {}: {}", self.config.base_url, e);
        if e.is_connect() || e.is_timeout() {
            AppError::external_unavailable(
                SERVICE_NAME,
                format!("Cannot reach {}: {e}", self.config.base_url),
            )
        } else {
            AppError::external_service(SERVICE_NAME, format!("Failed to connect: {e}"))
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    #[instrument(skip_all, fields(model = tracing::field::Empty))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        tracing::Span::current().record("model", model);

        let response_format = request.json_mode.then_some(ResponseFormat {
            format_type: "json_object",
        });

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format,
        };

        debug!(
            messages = openai_request.messages.len(),
            json_mode = openai_request.response_format.is_some(),
            "Sending chat completion request"
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(SERVICE_NAME, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE_NAME, "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .add_auth_header(self.client.get(self.api_url("models")))
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;

        let healthy = response.status().is_success();
        if !healthy {
            debug!(status = %response.status(), "LLM health check failed");
        }
        Ok(healthy)
    }
}
