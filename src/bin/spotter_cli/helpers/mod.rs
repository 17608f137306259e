// ABOUTME: Helper modules for spotter-cli
// ABOUTME: Shared account lookup and terminal output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;

use anyhow::{anyhow, Result};
use spotter::{database::Database, models::UserProfile};

/// Load an account by username
pub async fn find_user(database: &Database, username: &str) -> Result<UserProfile> {
    database
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| anyhow!("No account named '{username}'"))
}
