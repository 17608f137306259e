// ABOUTME: Integration tests for the OpenAI embeddings client against an in-process mock
// ABOUTME: Covers batching, response reordering, count checks, and retry versus fail-fast on errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::time::Duration;

use anyhow::Result;
use spotter::embeddings::{EmbeddingProvider, OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
use spotter::errors::ErrorCode;

use helpers::mock_servers::MockOpenAi;

fn provider(base_url: &str) -> OpenAiEmbeddingProvider {
    OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig {
        api_key: "sk-test".to_owned(),
        base_url: base_url.to_owned(),
        model: "text-embedding-test".to_owned(),
        dimension: 2,
        batch_size: 100,
        max_attempts: 3,
        initial_backoff: Duration::from_millis(5),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn inputs(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("exercise {i}")).collect()
}

#[tokio::test]
async fn test_large_input_is_split_into_batches() -> Result<()> {
    let llm = MockOpenAi::start("").await;
    let texts = inputs(101);

    let vectors = provider(&llm.base_url).embed_batch(&texts).await?;

    assert_eq!(vectors.len(), 101);
    assert_eq!(llm.state.lock().unwrap().embedding_batches, vec![100, 1]);
    // The mock lists items in reverse; each vector starts with its position in the batch
    let positions: Vec<usize> = vectors.iter().map(|v| v[0] as usize).collect();
    let expected: Vec<usize> = (0..100).chain([0]).collect();
    assert_eq!(positions, expected);
    assert_eq!(vectors[100][1] as usize, "exercise 100".len());
    Ok(())
}

#[tokio::test]
async fn test_empty_input_sends_nothing() -> Result<()> {
    let llm = MockOpenAi::start("").await;

    let vectors = provider(&llm.base_url).embed_batch(&[]).await?;

    assert!(vectors.is_empty());
    assert_eq!(llm.state.lock().unwrap().embedding_calls, 0);
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_then_success_is_retried() -> Result<()> {
    let llm = MockOpenAi::start("").await;
    llm.state
        .lock()
        .unwrap()
        .embedding_statuses
        .extend([429, 503]);

    let vectors = provider(&llm.base_url).embed_batch(&inputs(3)).await?;

    assert_eq!(vectors.len(), 3);
    assert_eq!(llm.state.lock().unwrap().embedding_calls, 3);
    Ok(())
}

#[tokio::test]
async fn test_persistent_rate_limit_gives_up_after_three_attempts() -> Result<()> {
    let llm = MockOpenAi::start("").await;
    llm.state
        .lock()
        .unwrap()
        .embedding_statuses
        .extend([429, 429, 429, 429]);

    let err = provider(&llm.base_url)
        .embed_batch(&inputs(2))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalRateLimited);
    assert_eq!(llm.state.lock().unwrap().embedding_calls, 3);
    Ok(())
}

#[tokio::test]
async fn test_client_errors_are_not_retried() -> Result<()> {
    let llm = MockOpenAi::start("").await;
    llm.state.lock().unwrap().embedding_statuses.push_back(400);

    let err = provider(&llm.base_url)
        .embed_batch(&inputs(2))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert_eq!(llm.state.lock().unwrap().embedding_calls, 1);

    llm.state.lock().unwrap().embedding_statuses.push_back(401);
    let err = provider(&llm.base_url)
        .embed_batch(&inputs(2))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(llm.state.lock().unwrap().embedding_calls, 2);
    Ok(())
}

#[tokio::test]
async fn test_short_response_is_rejected() -> Result<()> {
    let llm = MockOpenAi::start("").await;
    llm.state.lock().unwrap().drop_last_embedding = true;

    let err = provider(&llm.base_url)
        .embed_batch(&inputs(4))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert!(err.message.contains("Expected 4 embeddings, received 3"));
    assert_eq!(llm.state.lock().unwrap().embedding_calls, 1);
    Ok(())
}

#[test]
fn test_known_models_report_their_dimension() {
    let mut config = OpenAiEmbeddingConfig {
        api_key: "sk-test".to_owned(),
        base_url: "http://127.0.0.1:9/v1".to_owned(),
        model: "text-embedding-3-small".to_owned(),
        dimension: 64,
        batch_size: 100,
        max_attempts: 3,
        initial_backoff: Duration::from_millis(5),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
    };
    assert_eq!(OpenAiEmbeddingProvider::new(config.clone()).unwrap().dimension(), 1536);

    config.model = "custom-embedder".to_owned();
    assert_eq!(OpenAiEmbeddingProvider::new(config.clone()).unwrap().dimension(), 64);

    config.api_key = "  ".to_owned();
    assert_eq!(
        OpenAiEmbeddingProvider::new(config).err().unwrap().code,
        ErrorCode::ConfigError
    );
}
