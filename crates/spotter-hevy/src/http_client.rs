// ABOUTME: Pooled HTTP client shared by every Hevy client instance
// ABOUTME: Timeouts are configured once at startup and fall back to defaults otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("spotter/", env!("CARGO_PKG_VERSION"));

/// Request and connect timeouts, in seconds
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Configure timeouts for the shared client
///
/// Only the first call has any effect, and only if it happens before the
/// first [`shared_client`] call.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    if CLIENT_TIMEOUTS
        .set((timeout_secs, connect_timeout_secs))
        .is_err()
    {
        tracing::debug!("Hevy HTTP client timeouts already configured");
    }
}

/// Shared, connection-pooled client for Hevy requests
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = CLIENT_TIMEOUTS
            .get()
            .copied()
            .unwrap_or((DEFAULT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS));

        ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            })
    })
}
