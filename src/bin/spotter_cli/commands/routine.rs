// ABOUTME: Routine commands for spotter-cli
// ABOUTME: Drafts single-day routines and routine folders and prints them as markdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use spotter::{
    config::ServerConfig,
    resources::ServerResources,
    routines::{format_folder_markdown, format_routine_markdown, FolderRequest, RoutineRequest},
    units::UnitSystem,
};

use crate::helpers::{display::display_push, find_user};

/// Draft a single-day routine
pub async fn generate(
    config: ServerConfig,
    username: &str,
    day: String,
    focus: String,
    cardio: bool,
    imperial: bool,
) -> Result<()> {
    let resources = ServerResources::initialize(config).await?;
    let user = find_user(&resources.database, username).await?;

    let request = RoutineRequest {
        day,
        focus,
        split: None,
        include_cardio: cardio,
        additional_context: None,
    };
    let generated = resources.generator()?.generate_routine(&user, &request).await?;

    let units = if imperial {
        UnitSystem::Imperial
    } else {
        UnitSystem::Metric
    };
    if !generated.routine_description.is_empty() {
        println!("{}\n", generated.routine_description);
    }
    println!("{}", format_routine_markdown(&generated.routine, units));
    Ok(())
}

/// Plan and store a routine folder
pub async fn folder(
    config: ServerConfig,
    username: &str,
    split: Option<String>,
    period: &str,
    cardio: bool,
    push: bool,
) -> Result<()> {
    let resources = ServerResources::initialize(config).await?;
    let user = find_user(&resources.database, username).await?;

    let request = FolderRequest {
        split,
        period: period.parse()?,
        include_cardio: cardio,
        ..FolderRequest::default()
    };
    let folder = resources
        .generator()?
        .generate_routine_folder(&user, &request)
        .await?;

    println!("{}", format_folder_markdown(&folder, UnitSystem::Metric));
    println!("Stored routine folder {}", folder.id);

    if push {
        let report = resources.sync.push_routine_folder(&user, folder.id).await?;
        display_push(&report);
    }
    Ok(())
}
