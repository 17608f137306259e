// ABOUTME: Workout sync command for spotter-cli
// ABOUTME: Imports Hevy workouts for one account since a given date or the last sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use spotter::{config::ServerConfig, resources::ServerResources};

use crate::helpers::{display::display_workout_sync, find_user};

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
pub fn parse_since(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("Invalid --since '{value}': expected YYYY-MM-DD or RFC 3339"))
}

/// Import workouts for one account
pub async fn run(config: ServerConfig, username: &str, since: Option<&str>) -> Result<()> {
    let since = since.map(parse_since).transpose()?;
    let resources = ServerResources::initialize(config).await?;
    let user = find_user(&resources.database, username).await?;

    let report = resources.sync.sync_workouts(&user, since).await?;
    display_workout_sync(&report);
    Ok(())
}
