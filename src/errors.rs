// ABOUTME: Re-exports the unified error type from spotter-core
// ABOUTME: Keeps `crate::errors::*` paths stable across the root crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use spotter_core::errors::*;
