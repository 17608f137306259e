// ABOUTME: Semantic search over a user's workout history
// ABOUTME: Renders workouts as text documents and ranks them against a query by cosine similarity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::database::Database;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::errors::AppResult;
use crate::models::{Workout, WorkoutExercise, WorkoutSet};

/// A workout ranked against a history query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredWorkout {
    /// Workout id
    pub id: Uuid,
    /// Workout title
    pub title: String,
    /// Session start
    pub start_time: DateTime<Utc>,
    /// Session end
    pub end_time: DateTime<Utc>,
    /// Session length
    pub duration_minutes: i64,
    /// Number of exercises performed
    pub exercise_count: usize,
    /// Cosine similarity to the query
    pub score: f32,
    /// The text that was embedded
    pub document: String,
}

fn format_set(set: &WorkoutSet, exercise_title: &str) -> String {
    let mut text = if let Some(duration) = set.duration_seconds {
        format!("{duration}s")
    } else if let Some(distance) = set.distance_meters {
        format!("{distance}m")
    } else if let Some(metric) = set.custom_metric {
        let unit = if exercise_title.to_lowercase().contains("stair") {
            "floors"
        } else {
            "steps"
        };
        format!("{metric} {unit}")
    } else {
        format!(
            "{}kg x {} reps",
            set.weight_kg.unwrap_or(0.0),
            set.reps.unwrap_or(0)
        )
    };

    if let Some(rpe) = set.rpe {
        text.push_str(&format!(" @ RPE {rpe}"));
    }
    text
}

fn format_exercise(exercise: &WorkoutExercise) -> String {
    let sets: Vec<String> = exercise
        .sets
        .iter()
        .map(|set| format_set(set, &exercise.title))
        .collect();
    let mut text = format!("{}: {}", exercise.title, sets.join(" | "));
    if let Some(notes) = exercise.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        text.push_str(&format!(" [Notes: {notes}]"));
    }
    text
}

/// Text embedded for a workout
#[must_use]
pub fn workout_document(workout: &Workout) -> String {
    let exercises: Vec<String> = workout.exercises.iter().map(format_exercise).collect();
    format!(
        "Workout: {} - Date: {} - Duration: {} minutes - Exercises: {}",
        workout.title,
        workout.start_time.format("%Y-%m-%d"),
        workout.duration_minutes(),
        exercises.join("; ")
    )
}

/// Rank one user's workouts against a free-text query
///
/// Workouts with no exercises are not searchable. Document embeddings go
/// through the provider, so a cached provider only embeds new workouts.
///
/// # Errors
///
/// Returns an error if loading workouts or embedding fails
pub async fn search_workout_history(
    db: &Database,
    embedder: &dyn EmbeddingProvider,
    user_id: Uuid,
    query: &str,
    k: usize,
) -> AppResult<Vec<ScoredWorkout>> {
    if k == 0 || query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let workouts: Vec<Workout> = db
        .workouts_in_range(user_id, None, None)
        .await?
        .into_iter()
        .filter(|w| !w.title.trim().is_empty() && !w.exercises.is_empty())
        .collect();
    if workouts.is_empty() {
        return Ok(Vec::new());
    }

    let documents: Vec<String> = workouts.iter().map(workout_document).collect();
    let vectors = embedder.embed_batch(&documents).await?;
    let query_vector = embedder.embed(query).await?;

    let mut scored: Vec<ScoredWorkout> = workouts
        .into_iter()
        .zip(documents)
        .zip(vectors)
        .map(|((workout, document), vector)| ScoredWorkout {
            id: workout.id,
            duration_minutes: workout.duration_minutes(),
            exercise_count: workout.exercises.len(),
            score: cosine_similarity(&query_vector, &vector),
            title: workout.title,
            start_time: workout.start_time,
            end_time: workout.end_time,
            document,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.start_time.cmp(&a.start_time))
    });
    scored.truncate(k);

    debug!(%user_id, hits = scored.len(), "Workout history search");
    Ok(scored)
}
