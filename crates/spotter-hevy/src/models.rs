// ABOUTME: Serde types for Hevy API requests and responses
// ABOUTME: Field names follow Hevy's snake_case JSON schema exactly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spotter_core::models::{RoutineSet, SetType};

/// A logged set as Hevy reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HevySet {
    /// Position within the exercise
    #[serde(default)]
    pub index: u32,
    /// Kind of set
    #[serde(rename = "type", default)]
    pub set_type: SetType,
    /// Load in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Repetitions
    #[serde(default)]
    pub reps: Option<u32>,
    /// Distance
    #[serde(default)]
    pub distance_meters: Option<f64>,
    /// Duration
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// Rate of perceived exertion
    #[serde(default)]
    pub rpe: Option<f64>,
    /// Steps or floors
    #[serde(default)]
    pub custom_metric: Option<f64>,
}

/// An exercise inside a Hevy workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HevyWorkoutExercise {
    /// Position within the workout
    #[serde(default)]
    pub index: u32,
    /// Exercise name
    #[serde(default)]
    pub title: String,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Exercise template id
    pub exercise_template_id: String,
    /// Superset grouping
    #[serde(default)]
    pub superset_id: Option<u32>,
    /// Logged sets
    #[serde(default)]
    pub sets: Vec<HevySet>,
}

/// A Hevy workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HevyWorkout {
    /// Hevy workout id
    pub id: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: DateTime<Utc>,
    /// Last modification in Hevy
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Creation in Hevy
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Exercises
    #[serde(default)]
    pub exercises: Vec<HevyWorkoutExercise>,
}

/// `GET /workouts` page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyWorkoutsPage {
    /// Current page, 1-based
    pub page: u32,
    /// Total pages
    pub page_count: u32,
    /// Workouts on this page, newest first
    #[serde(default)]
    pub workouts: Vec<HevyWorkout>,
}

/// `GET /workouts/count` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyWorkoutCount {
    /// Total number of workouts
    #[serde(alias = "count")]
    pub workout_count: u64,
}

/// Change to a workout since a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HevyWorkoutEvent {
    /// Workout created or edited
    Updated {
        /// The workout after the change
        workout: HevyWorkout,
    },
    /// Workout removed
    Deleted {
        /// Removed workout id
        id: String,
        /// Removal time
        #[serde(default)]
        deleted_at: Option<DateTime<Utc>>,
    },
}

/// `GET /workouts/events` page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyWorkoutEventsPage {
    /// Current page
    pub page: u32,
    /// Total pages
    pub page_count: u32,
    /// Events on this page
    #[serde(default)]
    pub events: Vec<HevyWorkoutEvent>,
}

/// An exercise template from Hevy's library or the user's custom list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HevyExerciseTemplate {
    /// Template id
    pub id: String,
    /// Name
    pub title: String,
    /// Exercise type, e.g. `weight_reps`
    #[serde(rename = "type", default)]
    pub exercise_type: Option<String>,
    /// Primary muscle group
    #[serde(default)]
    pub primary_muscle_group: Option<String>,
    /// Secondary muscle groups
    #[serde(default)]
    pub secondary_muscle_groups: Vec<String>,
    /// Equipment category (`none` for bodyweight)
    #[serde(default)]
    pub equipment: Option<String>,
    /// Whether the user created this template
    #[serde(default)]
    pub is_custom: bool,
}

/// `GET /exercise_templates` page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyExerciseTemplatesPage {
    /// Current page
    pub page: u32,
    /// Total pages
    pub page_count: u32,
    /// Templates on this page
    #[serde(default)]
    pub exercise_templates: Vec<HevyExerciseTemplate>,
}

/// An exercise inside a Hevy routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HevyRoutineExercise {
    /// Position within the routine
    #[serde(default)]
    pub index: u32,
    /// Exercise name
    #[serde(default)]
    pub title: Option<String>,
    /// Exercise template id
    pub exercise_template_id: String,
    /// Superset grouping
    #[serde(default)]
    pub superset_id: Option<u32>,
    /// Rest between sets
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Planned sets
    #[serde(default)]
    pub sets: Vec<HevySet>,
}

/// A Hevy routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HevyRoutine {
    /// Routine id
    pub id: String,
    /// Title
    pub title: String,
    /// Folder id
    #[serde(default)]
    pub folder_id: Option<i64>,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Exercises
    #[serde(default)]
    pub exercises: Vec<HevyRoutineExercise>,
}

/// `GET /routines` page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyRoutinesPage {
    /// Current page
    pub page: u32,
    /// Total pages
    pub page_count: u32,
    /// Routines on this page
    #[serde(default)]
    pub routines: Vec<HevyRoutine>,
}

/// A Hevy routine folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HevyRoutineFolder {
    /// Folder id
    pub id: i64,
    /// Display order
    #[serde(default)]
    pub index: Option<u32>,
    /// Title
    pub title: String,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /routine_folders` page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HevyRoutineFoldersPage {
    /// Current page
    #[serde(default)]
    pub page: u32,
    /// Total pages
    #[serde(default)]
    pub page_count: u32,
    /// Folders on this page
    #[serde(default, alias = "folders")]
    pub routine_folders: Vec<HevyRoutineFolder>,
}

/// Body of `POST /routines` and `PUT /routines/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutinePayload {
    /// Routine body
    pub routine: RoutineBody,
}

/// Routine body sent to Hevy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineBody {
    /// Title
    pub title: String,
    /// Target folder (creation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    /// Notes
    pub notes: String,
    /// Exercises
    pub exercises: Vec<RoutineExerciseBody>,
}

/// Routine exercise sent to Hevy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineExerciseBody {
    /// Exercise template id
    pub exercise_template_id: String,
    /// Always sent, null when not part of a superset
    pub superset_id: Option<u32>,
    /// Rest between sets
    pub rest_seconds: u32,
    /// Notes
    pub notes: String,
    /// Planned sets
    pub sets: Vec<RoutineSet>,
}

/// Body of `POST /workouts` and `PUT /workouts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPayload {
    /// Workout body
    pub workout: WorkoutBody,
}

/// Workout body sent to Hevy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutBody {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: DateTime<Utc>,
    /// Hide from followers
    pub is_private: bool,
    /// Exercises
    pub exercises: Vec<WorkoutExerciseBody>,
}

/// Workout exercise sent to Hevy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExerciseBody {
    /// Exercise template id
    pub exercise_template_id: String,
    /// Superset grouping
    pub superset_id: Option<u32>,
    /// Notes
    pub notes: Option<String>,
    /// Logged sets
    pub sets: Vec<HevySet>,
}

/// Body of `POST /routine_folders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineFolderPayload {
    /// Folder body
    pub routine_folder: RoutineFolderBody,
}

/// Folder body sent to Hevy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineFolderBody {
    /// Title
    pub title: String,
}

/// Identifier of a created resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedId {
    /// Resource id
    pub id: String,
}

/// `POST /workouts` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedWorkoutResponse {
    /// Created workouts (always one)
    #[serde(default)]
    pub workout: Vec<CreatedId>,
}

/// `POST /routines` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRoutineResponse {
    /// Created routines (always one)
    #[serde(default)]
    pub routine: Vec<CreatedId>,
}

/// `POST /routine_folders` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRoutineFolderResponse {
    /// Created folder
    pub routine_folder: HevyRoutineFolder,
}
