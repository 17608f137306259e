// ABOUTME: Integration tests for the exercise catalog, similarity index, and workout history search
// ABOUTME: Runs against the built-in catalog with the hashing embedder and the database-backed cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use spotter::catalog::{
    builtin_exercises, ensure_catalog, search_workout_history, workout_document, ExerciseIndex,
    SearchFilter,
};
use spotter::embeddings::{cache_key, CachedEmbeddingProvider, EmbeddingProvider, HashingEmbeddingProvider};
use spotter::errors::AppResult;
use spotter::models::{Exercise, SetType, Workout, WorkoutExercise, WorkoutSet};

use common::{create_indexed_database, create_test_database, create_test_user, test_embedder};

/// Hashing embedder that counts how many texts reach it
struct CountingEmbedder {
    inner: HashingEmbeddingProvider,
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn model(&self) -> &str {
        "counting-v1"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts).await
    }
}

fn exercise(title: &str, template_id: &str, sets: Vec<WorkoutSet>) -> WorkoutExercise {
    WorkoutExercise {
        index: 0,
        title: title.to_owned(),
        notes: None,
        exercise_template_id: template_id.to_owned(),
        superset_id: None,
        sets,
    }
}

fn strength_set(weight: f64, reps: u32) -> WorkoutSet {
    WorkoutSet {
        set_type: SetType::Normal,
        weight_kg: Some(weight),
        reps: Some(reps),
        ..WorkoutSet::default()
    }
}

#[tokio::test]
async fn test_ensure_catalog_is_idempotent() -> Result<()> {
    let db = create_test_database().await?;

    let seeded = ensure_catalog(&db).await?;
    assert_eq!(seeded, builtin_exercises().len());
    assert_eq!(ensure_catalog(&db).await?, 0);
    assert_eq!(db.all_exercises().await?.len(), seeded);
    Ok(())
}

#[test]
fn test_builtin_catalog_has_unique_ids() {
    let catalog = builtin_exercises();
    let ids: HashSet<_> = catalog.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), catalog.len());
    assert!(catalog.iter().all(|e| !e.primary_muscles.is_empty()));
    assert!(catalog.iter().any(|e| e.id == "79D0BB3A"));
}

#[tokio::test]
async fn test_search_ranks_and_truncates() -> Result<()> {
    let (_db, index) = create_indexed_database().await?;

    let hits = index.search("chest", &SearchFilter::default(), 5).await?;
    assert_eq!(hits.len(), 5);
    assert!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));

    assert!(index.search("   ", &SearchFilter::default(), 5).await?.is_empty());
    assert!(index.search("chest", &SearchFilter::default(), 0).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_equipment_filter_restricts_results() -> Result<()> {
    let (_db, index) = create_indexed_database().await?;

    let barbell = index
        .by_equipment("barbell", &SearchFilter::default(), 50)
        .await?;
    assert!(!barbell.is_empty());
    assert!(barbell.iter().all(|hit| hit.exercise.uses_equipment("barbell")));

    let bodyweight = index
        .search("legs", &SearchFilter::default().with_equipment("bodyweight"), 50)
        .await?;
    assert!(bodyweight.iter().all(|hit| hit.exercise.equipment.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_by_goal_returns_unique_titles() -> Result<()> {
    let (_db, index) = create_indexed_database().await?;

    let hits = index.by_goal("strength", 8, &SearchFilter::default()).await?;
    assert!(!hits.is_empty());
    assert!(hits.len() <= 8);
    let titles: HashSet<_> = hits.iter().map(|hit| hit.exercise.title.clone()).collect();
    assert_eq!(titles.len(), hits.len());
    Ok(())
}

#[tokio::test]
async fn test_lookup_by_id_and_title() -> Result<()> {
    let (_db, index) = create_indexed_database().await?;

    let bench = index.get("79D0BB3A").await.unwrap();
    assert_eq!(bench.title, "Bench Press (Barbell)");
    assert_eq!(
        index.by_title("bench press (barbell)").await.map(|e| e.id),
        Some("79D0BB3A".to_owned())
    );
    assert!(index.get("NOTREAL1").await.is_none());

    let (ids, names) = index.ids_and_names().await;
    assert!(ids.contains("79D0BB3A"));
    assert_eq!(names.len(), index.len().await);
    Ok(())
}

#[tokio::test]
async fn test_custom_exercise_hidden_from_other_users() -> Result<()> {
    let (db, index) = create_indexed_database().await?;
    let owner = create_test_user(&db, "alex").await?;
    let other = create_test_user(&db, "blair").await?;

    let mut custom = Exercise::new("CUSTOM01", "Landmine Chest Press", &["chest"], &["triceps"], &["barbell"]);
    custom.is_custom = true;
    custom.owner_user_id = Some(owner.id);
    index.add_exercises(vec![custom]).await?;

    let mine = index
        .search("Landmine Chest Press", &SearchFilter::for_owner(owner.id), 50)
        .await?;
    assert!(mine.iter().any(|hit| hit.exercise.id == "CUSTOM01"));

    let theirs = index
        .search("Landmine Chest Press", &SearchFilter::for_owner(other.id), 50)
        .await?;
    assert!(theirs.iter().all(|hit| hit.exercise.id != "CUSTOM01"));
    Ok(())
}

#[test]
fn test_workout_document_format() {
    let start = Utc.with_ymd_and_hms(2025, 3, 4, 7, 30, 0).unwrap();
    let mut workout = Workout::new(uuid::Uuid::new_v4(), "Push Day", start, start + Duration::minutes(50));
    let mut bench = exercise(
        "Bench Press (Barbell)",
        "79D0BB3A",
        vec![strength_set(60.0, 8), strength_set(70.0, 5)],
    );
    bench.sets[1].rpe = Some(8.5);
    bench.notes = Some("Felt strong".to_owned());
    workout.exercises.push(bench);
    workout.exercises.push(exercise(
        "Plank",
        "C6C9B8A0",
        vec![WorkoutSet {
            duration_seconds: Some(60),
            ..WorkoutSet::default()
        }],
    ));

    assert_eq!(
        workout_document(&workout),
        "Workout: Push Day - Date: 2025-03-04 - Duration: 50 minutes - Exercises: \
         Bench Press (Barbell): 60kg x 8 reps | 70kg x 5 reps @ RPE 8.5 [Notes: Felt strong]; \
         Plank: 60s"
    );
}

#[tokio::test]
async fn test_workout_history_search_ranks_matching_session() -> Result<()> {
    let db = create_test_database().await?;
    let user = create_test_user(&db, "alex").await?;
    let embedder = test_embedder();

    let start = Utc.with_ymd_and_hms(2025, 3, 4, 7, 30, 0).unwrap();
    let mut push = Workout::new(user.id, "Chest and Triceps", start, start + Duration::minutes(60));
    push.exercises.push(exercise(
        "Bench Press (Barbell)",
        "79D0BB3A",
        vec![strength_set(80.0, 5)],
    ));
    let mut legs = Workout::new(
        user.id,
        "Leg Day",
        start + Duration::days(2),
        start + Duration::days(2) + Duration::minutes(70),
    );
    legs.exercises.push(exercise("Squat (Barbell)", "D04AC939", vec![strength_set(100.0, 5)]));
    let empty = Workout::new(user.id, "Rest", start + Duration::days(3), start + Duration::days(3));
    for workout in [&push, &legs, &empty] {
        db.save_workout(workout).await?;
    }

    let results =
        search_workout_history(&db, embedder.as_ref(), user.id, "Leg Day Squat (Barbell)", 5).await?;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, legs.id);
    assert_eq!(results[0].duration_minutes, 70);
    assert_eq!(results[0].exercise_count, 1);

    let none = search_workout_history(&db, embedder.as_ref(), user.id, "", 5).await?;
    assert!(none.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cached_embedder_reuses_stored_vectors() -> Result<()> {
    let db = create_test_database().await?;
    let counting = Arc::new(CountingEmbedder {
        inner: HashingEmbeddingProvider::new(64),
        calls: AtomicUsize::new(0),
    });
    let cached = CachedEmbeddingProvider::new(Arc::clone(&counting) as Arc<dyn EmbeddingProvider>, db.clone());

    let texts = vec!["bench press".to_owned(), "squat".to_owned(), "bench press".to_owned()];
    let first = cached.embed_batch(&texts).await?;
    assert_eq!(first.len(), 3);
    assert_eq!(first[0], first[2]);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 2);

    let second = cached.embed_batch(&texts).await?;
    assert_eq!(second, first);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 2);

    // A fresh wrapper over the same database starts with an empty memory cache
    let reopened = CachedEmbeddingProvider::new(Arc::clone(&counting) as Arc<dyn EmbeddingProvider>, db.clone());
    reopened.embed("squat").await?;
    assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    assert!(db
        .cached_embedding(&cache_key("counting-v1", "squat"))
        .await?
        .is_some());
    Ok(())
}

#[tokio::test]
async fn test_cached_vectors_of_another_dimension_are_recomputed() -> Result<()> {
    let db = create_test_database().await?;
    let wide = CachedEmbeddingProvider::new(Arc::new(HashingEmbeddingProvider::new(384)), db.clone());
    assert_eq!(wide.embed("Squat (Barbell)").await?.len(), 384);

    let narrow = CachedEmbeddingProvider::new(Arc::new(HashingEmbeddingProvider::new(128)), db.clone());
    assert_eq!(narrow.embed("Squat (Barbell)").await?.len(), 128);

    // Same model id, new dimension: the stored vector is ignored and replaced
    let counting = Arc::new(CountingEmbedder {
        inner: HashingEmbeddingProvider::new(64),
        calls: AtomicUsize::new(0),
    });
    CachedEmbeddingProvider::new(Arc::clone(&counting) as Arc<dyn EmbeddingProvider>, db.clone())
        .embed("deadlift")
        .await?;
    let shrunk = Arc::new(CountingEmbedder {
        inner: HashingEmbeddingProvider::new(32),
        calls: AtomicUsize::new(0),
    });
    let reopened =
        CachedEmbeddingProvider::new(Arc::clone(&shrunk) as Arc<dyn EmbeddingProvider>, db.clone());
    assert_eq!(reopened.embed("deadlift").await?.len(), 32);
    assert_eq!(shrunk.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        db.cached_embedding(&cache_key("counting-v1", "deadlift"))
            .await?
            .map(|v| v.len()),
        Some(32)
    );
    Ok(())
}

#[tokio::test]
async fn test_index_build_with_cached_embedder_matches_plain() -> Result<()> {
    let db = create_test_database().await?;
    let plain = ExerciseIndex::build(builtin_exercises(), test_embedder()).await?;
    let cached = ExerciseIndex::build(
        builtin_exercises(),
        Arc::new(CachedEmbeddingProvider::new(test_embedder(), db)),
    )
    .await?;

    let a = plain.search("shoulders", &SearchFilter::default(), 3).await?;
    let b = cached.search("shoulders", &SearchFilter::default(), 3).await?;
    let ids_a: Vec<_> = a.iter().map(|hit| hit.exercise.id.clone()).collect();
    let ids_b: Vec<_> = b.iter().map(|hit| hit.exercise.id.clone()).collect();
    assert_eq!(ids_a, ids_b);
    Ok(())
}
