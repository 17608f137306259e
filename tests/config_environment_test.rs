// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Covers parsing helpers, secret handling, embedding backend selection, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use serial_test::serial;
use spotter::config::environment::{
    parse_origins, DatabaseUrl, EmbeddingProviderType, Environment, ServerConfig,
};
use spotter::crypto::{encode_encryption_key, generate_encryption_key};
use spotter::errors::ErrorCode;

const MANAGED_VARS: &[&str] = &[
    "ENVIRONMENT",
    "HTTP_PORT",
    "HOST",
    "DATABASE_URL",
    "SPOTTER_ENCRYPTION_KEY",
    "JWT_SECRET",
    "JWT_EXPIRY_HOURS",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
    "LLM_TEMPERATURE",
    "EMBEDDING_PROVIDER",
    "EMBEDDING_DIMENSION",
    "HEVY_BASE_URL",
    "CORS_ORIGINS",
];

fn clear_env() {
    for var in MANAGED_VARS {
        env::remove_var(var);
    }
}

/// Load a config with the given variables set, restoring a clean slate afterwards
fn load_with(vars: &[(&str, &str)]) -> spotter::errors::AppResult<ServerConfig> {
    clear_env();
    for (key, value) in vars {
        env::set_var(key, value);
    }
    let result = ServerConfig::from_env();
    clear_env();
    result
}

#[test]
fn test_environment_parsing() {
    assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
    assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
    assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    assert!(Environment::Production.is_production());
}

#[test]
fn test_database_url_variants() {
    assert!(DatabaseUrl::parse_url("sqlite://:memory:").unwrap().is_memory());
    assert_eq!(
        DatabaseUrl::parse_url("./spotter.db").unwrap(),
        DatabaseUrl::SQLite {
            path: PathBuf::from("./spotter.db")
        }
    );
    assert_eq!(
        DatabaseUrl::parse_url("sqlite:/var/lib/spotter/db.sqlite")
            .unwrap()
            .to_connection_string(),
        "sqlite:/var/lib/spotter/db.sqlite"
    );

    let err = DatabaseUrl::parse_url("mysql://localhost/spotter").unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
fn test_embedding_provider_parsing() {
    assert_eq!(
        "OpenAI".parse::<EmbeddingProviderType>().unwrap(),
        EmbeddingProviderType::OpenAi
    );
    assert_eq!(
        "local".parse::<EmbeddingProviderType>().unwrap(),
        EmbeddingProviderType::Hashing
    );
    assert!("word2vec".parse::<EmbeddingProviderType>().is_err());
}

#[test]
fn test_cors_origin_list() {
    assert_eq!(parse_origins(" * "), vec!["*"]);
    assert!(parse_origins(" , ").is_empty());
}

#[test]
#[serial]
fn test_openai_key_switches_embedding_default() {
    let config = load_with(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
    assert_eq!(config.embeddings.provider, EmbeddingProviderType::OpenAi);
    assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));

    let forced = load_with(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("EMBEDDING_PROVIDER", "hashing"),
        ("EMBEDDING_DIMENSION", "128"),
    ])
    .unwrap();
    assert_eq!(forced.embeddings.provider, EmbeddingProviderType::Hashing);
    assert_eq!(forced.embeddings.dimension, 128);
}

#[test]
#[serial]
fn test_blank_openai_key_is_treated_as_missing() {
    let config = load_with(&[("OPENAI_API_KEY", "   ")]).unwrap();
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.embeddings.provider, EmbeddingProviderType::Hashing);
}

#[test]
#[serial]
fn test_openai_embeddings_require_key() {
    let err = load_with(&[("EMBEDDING_PROVIDER", "openai")]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_supplied_encryption_key_is_used() {
    let key = generate_encryption_key();
    let config = load_with(&[("SPOTTER_ENCRYPTION_KEY", &encode_encryption_key(&key))]).unwrap();
    assert_eq!(config.encryption_key, key);

    assert!(load_with(&[("SPOTTER_ENCRYPTION_KEY", "too-short")]).is_err());
}

#[test]
#[serial]
fn test_production_with_secrets_loads() {
    let key = encode_encryption_key(&generate_encryption_key());
    let config = load_with(&[
        ("ENVIRONMENT", "production"),
        ("SPOTTER_ENCRYPTION_KEY", &key),
        ("JWT_SECRET", "a-long-and-stable-secret"),
        ("HTTP_PORT", "9090"),
        ("HEVY_BASE_URL", "http://hevy.internal/v1"),
        ("CORS_ORIGINS", "https://app.example.com"),
    ])
    .unwrap();

    assert!(config.environment.is_production());
    assert_eq!(config.http_port, 9090);
    assert_eq!(config.jwt_secret, "a-long-and-stable-secret");
    assert_eq!(config.hevy.base_url, "http://hevy.internal/v1");
    assert_eq!(config.cors_origins, vec!["https://app.example.com"]);

    let missing_jwt = load_with(&[("ENVIRONMENT", "production"), ("SPOTTER_ENCRYPTION_KEY", &key)]);
    assert!(missing_jwt.is_err());
}

#[test]
#[serial]
fn test_out_of_range_values_rejected() {
    assert!(load_with(&[("LLM_TEMPERATURE", "3.5")]).is_err());
    assert!(load_with(&[("JWT_EXPIRY_HOURS", "0")]).is_err());
    assert!(load_with(&[("EMBEDDING_DIMENSION", "0")]).is_err());
    assert!(load_with(&[("JWT_EXPIRY_HOURS", "soon")]).is_err());
    assert!(load_with(&[("HEVY_BASE_URL", "api.hevyapp.com/v1")]).is_err());
    assert!(load_with(&[("OPENAI_BASE_URL", "http://")]).is_err());
}

#[test]
#[serial]
fn test_debug_output_hides_secrets() {
    let config = load_with(&[
        ("OPENAI_API_KEY", "sk-very-secret"),
        ("JWT_SECRET", "jwt-very-secret"),
    ])
    .unwrap();

    let rendered = format!("{config:?}");
    assert!(!rendered.contains("sk-very-secret"));
    assert!(!rendered.contains("jwt-very-secret"));
    assert!(!format!("{:?}", config.llm).contains("sk-very-secret"));
}
