// ABOUTME: Integration tests for Hevy synchronisation and routine folder pushes
// ABOUTME: Wires the sync service to a mock Hevy API and checks what lands in the store and the index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use spotter::catalog::SearchFilter;
use spotter::errors::ErrorCode;
use spotter::models::{
    Period, Routine, RoutineExercise, RoutineFolder, RoutineSet, SplitType, UserProfile,
};
use spotter::routines::RoutineRequest;
use uuid::Uuid;

use common::{create_test_resources, create_test_user, TEST_HEVY_KEY};
use helpers::mock_servers::{
    hevy_template_json, hevy_workout_json, routine_reply, MockHevy, MockHevyState, MockOpenAi,
};

fn templates() -> Vec<serde_json::Value> {
    vec![
        hevy_template_json("79D0BB3A", "Bench Press (Barbell)", "chest", "barbell", false),
        hevy_template_json("D04AC939", "Squat (Barbell)", "quadriceps", "barbell", false),
        hevy_template_json("CUSTOM01", "Landmine Rotation", "obliques", "barbell", true),
    ]
}

fn routine(title: &str, template_id: &str) -> Routine {
    Routine {
        title: title.to_owned(),
        folder_id: None,
        notes: Some("Two reps in reserve".to_owned()),
        exercises: vec![RoutineExercise {
            exercise_template_id: template_id.to_owned(),
            name: None,
            superset_id: None,
            rest_seconds: Some(90),
            notes: None,
            sets: vec![RoutineSet {
                weight_kg: Some(60.0),
                reps: Some(8),
                ..RoutineSet::default()
            }],
        }],
    }
}

fn folder(user: &UserProfile, routines: Vec<Routine>) -> RoutineFolder {
    RoutineFolder {
        id: Uuid::new_v4(),
        user_id: user.id,
        name: "Upper/Lower (week)".to_owned(),
        description: "Two day plan".to_owned(),
        split_type: SplitType::UpperLower,
        days_per_week: u8::try_from(routines.len()).unwrap(),
        period: Period::Week,
        date_range: "2025-03-03 to 2025-03-09".to_owned(),
        routines,
        hevy_folder_id: None,
        hevy_routine_ids: Vec::new(),
        created_at: Utc::now(),
    }
}

async fn user_with_key(
    resources: &spotter::resources::ServerResources,
    username: &str,
) -> Result<UserProfile> {
    let user = create_test_user(&resources.database, username).await?;
    resources
        .database
        .set_hevy_api_key(user.id, TEST_HEVY_KEY)
        .await?;
    Ok(user)
}

#[tokio::test]
async fn test_sync_exercises_stores_and_indexes_templates() -> Result<()> {
    let hevy = MockHevy::start(MockHevyState {
        templates: templates(),
        ..MockHevyState::default()
    })
    .await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = user_with_key(&resources, "alex").await?;
    let other = create_test_user(&resources.database, "blair").await?;
    let indexed_before = resources.index.len().await;

    let report = resources.sync.sync_exercises(&user).await?;
    assert_eq!(report.base, 2);
    assert_eq!(report.custom, 1);
    assert_eq!(report.indexed, 3);
    // Base templates replace built-in entries with the same id
    assert_eq!(resources.index.len().await, indexed_before + 1);

    let customs = resources.database.custom_exercises(user.id).await?;
    assert_eq!(customs.len(), 1);
    assert_eq!(customs[0].id, "CUSTOM01");

    let visible = resources
        .index
        .search("Landmine Rotation", &SearchFilter::for_owner(user.id), 50)
        .await?;
    assert!(visible.iter().any(|hit| hit.exercise.id == "CUSTOM01"));
    let hidden = resources
        .index
        .search("Landmine Rotation", &SearchFilter::for_owner(other.id), 50)
        .await?;
    assert!(hidden.iter().all(|hit| hit.exercise.id != "CUSTOM01"));
    Ok(())
}

#[tokio::test]
async fn test_synced_templates_replace_builtin_entries_with_same_title() -> Result<()> {
    let hevy = MockHevy::start(MockHevyState {
        templates: vec![
            hevy_template_json("REALBENCH", "Bench Press (Barbell)", "chest", "barbell", false),
            hevy_template_json("REALPUSH", "push up", "chest", "none", false),
        ],
        ..MockHevyState::default()
    })
    .await;
    let llm = MockOpenAi::start(routine_reply("Chest Day")).await;
    let resources = create_test_resources(&hevy.base_url, Some(&llm.base_url)).await?;
    let user = user_with_key(&resources, "alex").await?;
    let indexed_before = resources.index.len().await;

    let report = resources.sync.sync_exercises(&user).await?;
    assert_eq!(report.replaced, 2);
    assert_eq!(resources.index.len().await, indexed_before);
    assert!(resources.index.get("79D0BB3A").await.is_none());
    assert!(resources.index.get("392887AA").await.is_none());
    assert_eq!(
        resources.index.by_title("Push Up").await.map(|e| e.id),
        Some("REALPUSH".to_owned())
    );

    let stored: Vec<String> = resources
        .database
        .all_exercises()
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert!(stored.contains(&"REALBENCH".to_owned()));
    assert!(!stored.contains(&"79D0BB3A".to_owned()));
    assert!(!stored.contains(&"392887AA".to_owned()));

    let generated = resources
        .generator()?
        .generate_routine(
            &user,
            &RoutineRequest {
                day: "Monday".to_owned(),
                focus: "Chest".to_owned(),
                split: None,
                include_cardio: false,
                additional_context: None,
            },
        )
        .await?;
    let ids: Vec<_> = generated
        .routine
        .exercises
        .iter()
        .map(|e| e.exercise_template_id.as_str())
        .collect();
    assert_eq!(ids, vec!["D04AC939"]);

    let prompt = llm.state.lock().unwrap().requests[0]["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(!prompt.contains("79D0BB3A"));
    assert!(!prompt.contains("392887AA"));

    // A second sync has nothing left to replace
    assert_eq!(resources.sync.sync_exercises(&user).await?.replaced, 0);
    Ok(())
}

#[tokio::test]
async fn test_sync_requires_stored_key() -> Result<()> {
    let hevy = MockHevy::start(MockHevyState::default()).await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = create_test_user(&resources.database, "alex").await?;

    let err = resources.sync.sync_workouts(&user, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_sync_workouts_imports_once() -> Result<()> {
    let newest = Utc.with_ymd_and_hms(2025, 3, 20, 7, 0, 0).unwrap();
    let workouts = (0..12)
        .map(|i| hevy_workout_json(&format!("w-{i}"), "Push", newest - Duration::days(i)))
        .collect();
    let hevy = MockHevy::start(MockHevyState {
        workouts,
        ..MockHevyState::default()
    })
    .await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = user_with_key(&resources, "alex").await?;
    let since = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    let first = resources.sync.sync_workouts(&user, Some(since)).await?;
    assert_eq!((first.fetched, first.imported, first.skipped), (12, 12, 0));

    let second = resources.sync.sync_workouts(&user, Some(since)).await?;
    assert_eq!((second.fetched, second.imported, second.skipped), (12, 0, 12));

    let stored = resources.database.list_workouts(user.id, 50, 0).await?;
    assert_eq!(stored.len(), 12);
    assert!(stored.iter().all(|w| w.last_synced.is_some()));
    assert!(resources.database.last_sync(user.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_sync_workouts_resumes_from_last_sync() -> Result<()> {
    let now = Utc::now();
    let workouts = vec![
        hevy_workout_json("recent", "Legs", now - Duration::days(1)),
        hevy_workout_json("older", "Push", now - Duration::days(3)),
    ];
    let hevy = MockHevy::start(MockHevyState {
        workouts,
        ..MockHevyState::default()
    })
    .await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = user_with_key(&resources, "alex").await?;
    resources
        .database
        .set_last_sync(user.id, now - Duration::days(2))
        .await?;

    let report = resources.sync.sync_workouts(&user, None).await?;
    assert_eq!(report.fetched, 1);
    assert_eq!(report.imported, 1);

    let ids = resources.database.existing_hevy_ids(user.id).await?;
    assert!(ids.contains("recent"));
    assert!(!ids.contains("older"));
    Ok(())
}

#[tokio::test]
async fn test_push_folder_records_hevy_ids_and_failures() -> Result<()> {
    let hevy = MockHevy::start(MockHevyState {
        templates: templates(),
        reject_titles: vec!["Wednesday - Lower Body".to_owned()],
        ..MockHevyState::default()
    })
    .await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = user_with_key(&resources, "alex").await?;
    let stored = folder(
        &user,
        vec![
            routine("Monday - Upper Body", "79D0BB3A"),
            routine("Wednesday - Lower Body", "D04AC939"),
        ],
    );
    resources.database.save_routine_folder(&stored).await?;

    let report = resources.sync.push_routine_folder(&user, stored.id).await?;
    assert_eq!(report.folder_id, 1000);
    assert_eq!(report.routine_ids, vec!["routine-1".to_owned()]);
    assert_eq!(report.failed, vec!["Wednesday - Lower Body".to_owned()]);

    {
        let state = hevy.state.lock().unwrap();
        assert_eq!(state.created_folders[0].1, "Upper/Lower (week)");
        assert_eq!(state.created_routines[0]["routine"]["folder_id"], 1000);
    }

    let pushed = resources
        .database
        .get_routine_folder(user.id, stored.id)
        .await?
        .unwrap();
    assert_eq!(pushed.hevy_folder_id, Some(1000));
    assert_eq!(pushed.hevy_routine_ids, vec!["routine-1".to_owned()]);

    let again = resources
        .sync
        .push_routine_folder(&user, stored.id)
        .await
        .unwrap_err();
    assert_eq!(again.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(hevy.state.lock().unwrap().created_folders.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_push_folder_with_no_accepted_routines_fails() -> Result<()> {
    let hevy = MockHevy::start(MockHevyState {
        templates: templates(),
        ..MockHevyState::default()
    })
    .await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = user_with_key(&resources, "alex").await?;
    let stored = folder(&user, vec![routine("Monday - Upper Body", "NOTREAL1")]);
    resources.database.save_routine_folder(&stored).await?;

    let err = resources
        .sync
        .push_routine_folder(&user, stored.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceError);

    let unchanged = resources
        .database
        .get_routine_folder(user.id, stored.id)
        .await?
        .unwrap();
    assert!(!unchanged.is_pushed());
    Ok(())
}

#[tokio::test]
async fn test_push_unknown_folder_is_not_found() -> Result<()> {
    let hevy = MockHevy::start(MockHevyState::default()).await;
    let resources = create_test_resources(&hevy.base_url, None).await?;
    let user = user_with_key(&resources, "alex").await?;

    let err = resources
        .sync
        .push_routine_folder(&user, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}
