// ABOUTME: Core data models for profiles, workouts, exercises, and routines
// ABOUTME: Re-exports the domain structures shared by storage, generation, and sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Domain structures shared by every Spotter crate.
//!
//! - `UserProfile`: a trainee with body metrics, goals, injuries, and preferences
//! - `Workout`: a completed session, optionally linked to a Hevy workout
//! - `Exercise`: a catalog entry keyed by its Hevy exercise template id
//! - `Routine` / `RoutineFolder`: generated plans ready to push to Hevy

mod exercise;
mod profile;
mod routine;
mod workout;

pub use exercise::{muscle_category, Exercise, MuscleGroup};
pub use profile::{
    ExperienceLevel, FitnessGoal, Injury, InjurySeverity, ProfileUpdate, Sex, UserProfile,
    WeightEntry,
};
pub use routine::{
    GeneratedRoutine, Period, Routine, RoutineExercise, RoutineFolder, RoutineSet, SplitPreference,
    SplitType,
};
pub use workout::{ProgressionEntry, SetType, Workout, WorkoutExercise, WorkoutSet, WorkoutStats};
