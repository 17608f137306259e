// ABOUTME: Workout session model with exercises, sets, and aggregate statistics
// ABOUTME: Mirrors Hevy's workout structure so synced sessions round-trip cleanly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
    /// Light preparatory set
    Warmup,
    /// Working set
    #[default]
    Normal,
    /// Taken to failure
    Failure,
    /// Drop set
    Dropset,
}

impl SetType {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Normal => "normal",
            Self::Failure => "failure",
            Self::Dropset => "dropset",
        }
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One performed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkoutSet {
    /// Position within the exercise
    #[serde(default)]
    pub index: u32,
    /// Kind of set
    #[serde(default)]
    pub set_type: SetType,
    /// Load in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Repetitions
    #[serde(default)]
    pub reps: Option<u32>,
    /// Distance covered
    #[serde(default)]
    pub distance_meters: Option<f64>,
    /// Time under load
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// Rate of perceived exertion
    #[serde(default)]
    pub rpe: Option<f64>,
    /// Steps or floors for machine cardio
    #[serde(default)]
    pub custom_metric: Option<f64>,
}

/// One exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Position within the workout
    #[serde(default)]
    pub index: u32,
    /// Exercise name as logged
    pub title: String,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Hevy exercise template id
    pub exercise_template_id: String,
    /// Superset grouping
    #[serde(default)]
    pub superset_id: Option<u32>,
    /// Performed sets
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// A completed training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Hevy workout id when the session was synced
    #[serde(default)]
    pub hevy_id: Option<String>,
    /// Session title
    pub title: String,
    /// Session description
    #[serde(default)]
    pub description: Option<String>,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: DateTime<Utc>,
    /// Exercises in order
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// When the session was last pulled from Hevy
    #[serde(default)]
    pub last_synced: Option<DateTime<Utc>>,
}

impl Workout {
    /// Create a manual workout for a user
    #[must_use]
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            hevy_id: None,
            title: title.into(),
            description: None,
            start_time,
            end_time,
            exercises: Vec::new(),
            created_at: now,
            updated_at: now,
            last_synced: None,
        }
    }

    /// Session length in whole minutes; never negative
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes().max(0)
    }

    /// Total number of sets across all exercises
    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

/// Aggregate statistics over a user's workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkoutStats {
    /// Number of sessions
    pub total_workouts: u64,
    /// Number of exercise entries across sessions
    pub total_exercises: u64,
    /// Summed session length
    pub total_duration_minutes: i64,
    /// Most recent session start
    pub last_workout_date: Option<DateTime<Utc>>,
}

/// Sets performed for one exercise in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionEntry {
    /// Session start
    pub date: DateTime<Utc>,
    /// Session id
    pub workout_id: Uuid,
    /// Sets performed for the exercise
    pub sets: Vec<WorkoutSet>,
}
