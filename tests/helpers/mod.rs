// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the axum request driver and the mock Hevy and OpenAI servers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub mod axum_test;
pub mod mock_servers;
