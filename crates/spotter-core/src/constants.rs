// ABOUTME: Domain constants for training defaults, muscle vocabularies, and goal mappings
// ABOUTME: Pure data constants shared by the stores, the exercise index, and the generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Profile defaults and validation bounds
pub mod profile {
    /// Default number of training days per week
    pub const DEFAULT_WORKOUT_DAYS: u8 = 3;
    /// Default session length in minutes
    pub const DEFAULT_WORKOUT_DURATION_MINUTES: u32 = 60;
    /// Minimum training days per week
    pub const MIN_WORKOUT_DAYS: u8 = 1;
    /// Maximum training days per week
    pub const MAX_WORKOUT_DAYS: u8 = 7;
    /// Shortest session we will plan for
    pub const MIN_WORKOUT_DURATION_MINUTES: u32 = 15;
    /// Longest session we will plan for
    pub const MAX_WORKOUT_DURATION_MINUTES: u32 = 240;
    /// Minimum username length
    pub const MIN_USERNAME_LEN: usize = 3;
    /// Maximum username length
    pub const MAX_USERNAME_LEN: usize = 32;
    /// Minimum password length
    pub const MIN_PASSWORD_LEN: usize = 8;
}

/// Muscle group vocabulary used by the exercise index
pub mod muscles {
    /// Broad categories a free-text query may name directly
    pub const GENERAL_CATEGORIES: &[&str] = &["arms", "legs", "back", "chest", "shoulders", "core"];

    /// Mapping of specific muscles onto their broad category
    pub const CATEGORY_MAP: &[(&str, &str)] = &[
        ("upper_back", "back"),
        ("lower_back", "back"),
        ("middle_back", "back"),
        ("lats", "back"),
        ("traps", "back"),
        ("chest", "chest"),
        ("pectorals", "chest"),
        ("shoulders", "shoulders"),
        ("deltoids", "shoulders"),
        ("arms", "arms"),
        ("biceps", "arms"),
        ("triceps", "arms"),
        ("forearms", "arms"),
        ("legs", "legs"),
        ("quadriceps", "legs"),
        ("hamstrings", "legs"),
        ("calves", "legs"),
        ("glutes", "legs"),
        ("core", "core"),
        ("abs", "core"),
        ("abdominals", "core"),
        ("obliques", "core"),
        ("cardio", "cardio"),
    ];

    /// Equipment label used when an exercise needs nothing
    pub const BODYWEIGHT: &str = "bodyweight";
}

/// Goal to muscle-group search plan
pub mod goals {
    /// Muscle groups searched for strength-oriented goals
    pub const STRENGTH_GROUPS: &[&str] = &["chest", "back", "legs", "shoulders", "arms"];
    /// Muscle groups searched for endurance goals
    pub const ENDURANCE_GROUPS: &[&str] = &["legs", "core"];
    /// Muscle groups searched for flexibility goals
    pub const FLEXIBILITY_GROUPS: &[&str] = &["core", "back", "legs"];
    /// Muscle groups searched for any other goal
    pub const ALL_GROUPS: &[&str] = &["chest", "back", "legs", "shoulders", "arms", "core"];
}

/// Routine generation defaults
pub mod routines {
    /// Rest applied to routine exercises that do not specify one
    pub const DEFAULT_REST_SECONDS: u32 = 90;
    /// Unique candidate exercises handed to the model
    pub const MAX_CANDIDATE_EXERCISES: usize = 10;
    /// Raw neighbours fetched before de-duplication
    pub const CANDIDATE_SEARCH_K: usize = 20;
    /// Similar past workouts included in a prompt
    pub const SIMILAR_WORKOUTS: usize = 3;
    /// Fallback exercise name when an id cannot be resolved
    pub const UNKNOWN_EXERCISE: &str = "Unknown Exercise";
    /// Minutes of session time per minute of required cardio
    pub const CARDIO_MINUTES_DIVISOR: u32 = 10;
}
