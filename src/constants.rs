// ABOUTME: Service-level constants for the Spotter server, API, and integrations
// ABOUTME: Defaults for ports, tokens, pagination, embeddings, and external endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server constants. Domain vocabularies live in `spotter_core::constants`.

pub use spotter_core::constants::{goals, muscles, profile, routines};

/// Service identity
pub mod service_names {
    /// Default service name for logs
    pub const SPOTTER_SERVER: &str = "spotter-server";
    /// JWT audience
    pub const JWT_AUDIENCE: &str = "spotter";
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// Upper bound on JSON request bodies
    pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;
    /// Per-request timeout; routine folders make several model calls
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;
}

/// Authentication defaults
pub mod auth {
    /// Default token lifetime
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
    /// bcrypt cost factor
    pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
    /// Bearer scheme prefix
    pub const BEARER_PREFIX: &str = "Bearer ";
}

/// Storage defaults
pub mod storage {
    /// Default database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/spotter.db";
    /// Connection pool size
    pub const MAX_CONNECTIONS: u32 = 5;
    /// AES-GCM nonce length
    pub const NONCE_LEN: usize = 12;
    /// AES-256 key length
    pub const KEY_LEN: usize = 32;
}

/// Pagination defaults for list endpoints
pub mod pagination {
    /// Default page size
    pub const DEFAULT_LIMIT: u32 = 20;
    /// Largest page size accepted
    pub const MAX_LIMIT: u32 = 200;
    /// Default neighbours returned by search endpoints
    pub const DEFAULT_SEARCH_K: usize = 5;
    /// Largest `k` accepted by search endpoints
    pub const MAX_SEARCH_K: usize = 50;
}

/// Embedding defaults
pub mod embeddings {
    /// OpenAI embedding model
    pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
    /// Dimension of the offline hashing embedder
    pub const DEFAULT_HASHING_DIMENSION: usize = 384;
    /// Inputs per OpenAI embeddings request
    pub const MAX_BATCH_SIZE: usize = 100;
    /// Attempts per embeddings request
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Initial retry delay
    pub const INITIAL_BACKOFF_MS: u64 = 500;
    /// Model name reported by the hashing embedder
    pub const HASHING_MODEL: &str = "feature-hashing-v1";
    /// Hot embeddings kept in memory in front of the database cache
    pub const MEMORY_CACHE_CAPACITY: usize = 1024;
}

/// Language model defaults
pub mod llm {
    /// OpenAI API base URL
    pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Chat model used for routine generation
    pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
    /// Sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    /// Completion budget for a single routine
    pub const ROUTINE_MAX_TOKENS: u32 = 4000;
}

/// Hevy sync defaults
pub mod sync {
    /// Look-back window for a first sync
    pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
}

/// HTTP client defaults
pub mod http_client {
    /// Request timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
}
