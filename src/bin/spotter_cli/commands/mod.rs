// ABOUTME: Command modules for spotter-cli
// ABOUTME: Account, catalog, sync, and routine commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod exercises;
pub mod routine;
pub mod sync;
pub mod user;
