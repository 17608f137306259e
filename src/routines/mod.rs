// ABOUTME: Routine planning, generation, parsing, and rendering
// ABOUTME: Turns a trainee profile and the exercise index into Hevy-ready routines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Routines
//!
//! Generation runs in four steps:
//!
//! 1. [`split`] picks a workout split and the weekly schedule
//! 2. [`RoutineGenerator`] retrieves candidate exercises and similar past workouts
//! 3. [`prompt`] renders the request and the model answers in JSON mode
//! 4. [`parse`] validates the reply against the catalog
//!
//! [`markdown`] renders the result for people.

pub mod generator;
pub mod markdown;
pub mod parse;
pub mod prompt;
pub mod split;

pub use generator::{FolderRequest, RoutineGenerator, RoutineRequest};
pub use markdown::{format_folder_markdown, format_routine_markdown};
pub use parse::parse_generated_routine;
pub use prompt::{build_routine_prompt, PromptContext};
pub use split::{date_range, determine_workout_split, split_schedule, ScheduledDay};
