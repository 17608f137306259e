// ABOUTME: Exercise catalog commands for spotter-cli
// ABOUTME: Seeds the built-in catalog or imports templates from a Hevy account
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use spotter::{catalog::ensure_catalog, config::ServerConfig, resources::ServerResources};

use crate::helpers::{display::display_exercise_sync, find_user};

/// Store the built-in catalog, or pull exercise templates from Hevy
pub async fn bootstrap(config: ServerConfig, from_hevy: bool, username: Option<&str>) -> Result<()> {
    let resources = ServerResources::initialize(config).await?;

    if from_hevy {
        let username = username.ok_or_else(|| anyhow!("--from-hevy requires --username"))?;
        let user = find_user(&resources.database, username).await?;
        let report = resources.sync.sync_exercises(&user).await?;
        display_exercise_sync(&report);
    } else {
        let stored = ensure_catalog(&resources.database).await?;
        if stored == 0 {
            println!("Exercise catalog already present");
        } else {
            println!("Stored {stored} built-in exercises");
        }
    }

    println!("Index holds {} exercises", resources.index.len().await);
    Ok(())
}
