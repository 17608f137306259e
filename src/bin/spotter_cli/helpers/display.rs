// ABOUTME: Output formatting helpers for spotter-cli
// ABOUTME: Prints accounts and sync reports consistently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use spotter::models::UserProfile;
use spotter::services::{ExerciseSyncReport, PushReport, SyncReport};

/// Display a newly created account
pub fn display_user(user: &UserProfile) {
    println!("\nAccount created");
    println!("{}", "=".repeat(60));
    println!("   Username: {}", user.username);
    println!("   Email: {}", user.email);
    println!("   User ID: {}", user.id);
    println!(
        "   Hevy key: {}",
        if user.has_hevy_api_key { "stored" } else { "not set" }
    );
    println!("{}", "=".repeat(60));
}

/// Display an exercise template sync
pub fn display_exercise_sync(report: &ExerciseSyncReport) {
    println!(
        "Exercise templates: {} shared, {} custom, {} indexed, {} built-in replaced",
        report.base, report.custom, report.indexed, report.replaced
    );
}

/// Display a workout sync
pub fn display_workout_sync(report: &SyncReport) {
    println!(
        "Workouts: {} fetched, {} imported, {} already stored",
        report.fetched, report.imported, report.skipped
    );
}

/// Display a routine folder push
pub fn display_push(report: &PushReport) {
    println!(
        "Pushed to Hevy folder {}: {} routine(s) created",
        report.folder_id,
        report.routine_ids.len()
    );
    for title in &report.failed {
        println!("   failed: {title}");
    }
}
