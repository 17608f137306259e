// ABOUTME: Account commands for spotter-cli
// ABOUTME: Creates accounts and optionally stores the Hevy API key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use spotter::{config::ServerConfig, database::Database};
use tracing::info;

use crate::helpers::display::display_user;

/// Create an account
pub async fn create(
    config: &ServerConfig,
    username: &str,
    email: &str,
    password: &str,
    hevy_api_key: Option<String>,
) -> Result<()> {
    let database = Database::new(
        &config.database_url.to_connection_string(),
        config.encryption_key,
    )
    .await?;

    let mut user = database.create_user(username, email, password).await?;
    info!(user_id = %user.id, "Account created");

    if let Some(key) = hevy_api_key.filter(|k| !k.trim().is_empty()) {
        database.set_hevy_api_key(user.id, key.trim()).await?;
        user = database.get_user_required(user.id).await?;
    }

    display_user(&user);
    Ok(())
}
