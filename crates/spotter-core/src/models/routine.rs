// ABOUTME: Generated routine and routine folder models in Hevy's routine shape
// ABOUTME: Includes workout split and planning period vocabularies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::workout::SetType;
use crate::errors::AppError;

/// One planned set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RoutineSet {
    /// Kind of set
    #[serde(rename = "type", default)]
    pub set_type: SetType,
    /// Target load in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Target repetitions
    #[serde(default)]
    pub reps: Option<u32>,
    /// Target distance
    #[serde(default)]
    pub distance_meters: Option<f64>,
    /// Target duration
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// Target steps or floors
    #[serde(default)]
    pub custom_metric: Option<f64>,
}

/// One planned exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    /// Hevy exercise template id
    pub exercise_template_id: String,
    /// Resolved exercise name (not sent to Hevy)
    #[serde(default)]
    pub name: Option<String>,
    /// Superset grouping
    #[serde(default)]
    pub superset_id: Option<u32>,
    /// Rest between sets
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    /// Coaching notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Planned sets
    #[serde(default)]
    pub sets: Vec<RoutineSet>,
}

/// A single-day routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    /// Routine title
    pub title: String,
    /// Hevy folder the routine belongs to
    #[serde(default)]
    pub folder_id: Option<i64>,
    /// Routine notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Planned exercises
    #[serde(default)]
    pub exercises: Vec<RoutineExercise>,
}

/// A routine together with the model's explanation of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRoutine {
    /// Free-text rationale from the model
    pub routine_description: String,
    /// The routine itself
    pub routine: Routine,
}

/// How training days are divided across muscle groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    /// Every session trains the whole body
    FullBody,
    /// Alternating upper and lower body days
    UpperLower,
    /// Push, pull, and legs days
    PushPull,
}

impl SplitType {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullBody => "full_body",
            Self::UpperLower => "upper_lower",
            Self::PushPull => "push_pull",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FullBody => "Full Body",
            Self::UpperLower => "Upper/Lower",
            Self::PushPull => "Push/Pull/Legs",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-', '/'], "_").as_str() {
            "full_body" => Ok(Self::FullBody),
            "upper_lower" => Ok(Self::UpperLower),
            "push_pull" | "push_pull_legs" => Ok(Self::PushPull),
            other => Err(AppError::invalid_input(format!(
                "Unknown workout split: {other}"
            ))),
        }
    }
}

/// A requested split: either fixed or chosen from the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPreference {
    /// Pick based on experience and training days
    #[default]
    Auto,
    /// Use this split
    Fixed(SplitType),
}

impl FromStr for SplitPreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Fixed)
        }
    }
}

/// Planning horizon for a routine folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Seven days
    #[default]
    Week,
    /// Thirty days
    Month,
}

impl Period {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Length in days
    #[must_use]
    pub const fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(AppError::invalid_input(format!("Unknown period: {other}"))),
        }
    }
}

/// A set of routines covering one planning period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineFolder {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Folder name
    pub name: String,
    /// Folder description
    pub description: String,
    /// Split used to plan the days
    pub split_type: SplitType,
    /// Training days per week
    pub days_per_week: u8,
    /// Planning horizon
    pub period: Period,
    /// `YYYY-MM-DD to YYYY-MM-DD`
    pub date_range: String,
    /// One routine per training day
    pub routines: Vec<Routine>,
    /// Hevy folder id once pushed
    #[serde(default)]
    pub hevy_folder_id: Option<i64>,
    /// Hevy routine ids once pushed
    #[serde(default)]
    pub hevy_routine_ids: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RoutineFolder {
    /// Whether the folder has been pushed to Hevy
    #[must_use]
    pub const fn is_pushed(&self) -> bool {
        self.hevy_folder_id.is_some()
    }
}
