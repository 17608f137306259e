// ABOUTME: User fitness profile model with goals, injuries, equipment, and body metrics
// ABOUTME: Includes partial-update validation and weight history bookkeeping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::profile::{
    DEFAULT_WORKOUT_DAYS, DEFAULT_WORKOUT_DURATION_MINUTES, MAX_WORKOUT_DAYS,
    MAX_WORKOUT_DURATION_MINUTES, MIN_WORKOUT_DAYS, MIN_WORKOUT_DURATION_MINUTES,
};
use crate::errors::{AppError, AppResult};

/// Self-reported sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
    /// Other
    Other,
    /// Declined to answer
    PreferNotToSay,
}

impl Sex {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

/// Training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Less than about a year of consistent training
    #[default]
    Beginner,
    /// Comfortable with the main lifts
    Intermediate,
    /// Years of structured training
    Advanced,
}

impl ExperienceLevel {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(AppError::invalid_input(format!(
                "Unknown experience level: {other}"
            ))),
        }
    }
}

/// Training goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    /// Maximal strength
    Strength,
    /// Hypertrophy
    MuscleGain,
    /// Fat loss
    WeightLoss,
    /// Muscular and cardiovascular endurance
    Endurance,
    /// Mobility and range of motion
    Flexibility,
    /// Overall health
    GeneralFitness,
    /// Sport-specific preparation
    SportsPerformance,
    /// Returning from injury
    Rehabilitation,
}

impl FitnessGoal {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::MuscleGain => "muscle_gain",
            Self::WeightLoss => "weight_loss",
            Self::Endurance => "endurance",
            Self::Flexibility => "flexibility",
            Self::GeneralFitness => "general_fitness",
            Self::SportsPerformance => "sports_performance",
            Self::Rehabilitation => "rehabilitation",
        }
    }

    /// Human-readable label used in prompts
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessGoal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "strength" => Ok(Self::Strength),
            "muscle_gain" | "hypertrophy" => Ok(Self::MuscleGain),
            "weight_loss" => Ok(Self::WeightLoss),
            "endurance" => Ok(Self::Endurance),
            "flexibility" => Ok(Self::Flexibility),
            "general_fitness" => Ok(Self::GeneralFitness),
            "sports_performance" => Ok(Self::SportsPerformance),
            "rehabilitation" => Ok(Self::Rehabilitation),
            other => Err(AppError::invalid_input(format!(
                "Unknown fitness goal: {other}"
            ))),
        }
    }
}

/// Injury severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    /// Minor discomfort
    Mild,
    /// Limits some movements
    Moderate,
    /// Avoid loading the area
    Severe,
}

impl InjurySeverity {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

const fn default_true() -> bool {
    true
}

/// A current or past injury the generator must work around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    /// Free-text description
    pub description: String,
    /// Affected body part
    pub body_part: String,
    /// Severity
    pub severity: InjurySeverity,
    /// When it happened
    #[serde(default)]
    pub date_injured: Option<NaiveDate>,
    /// Whether the injury still affects training
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Additional notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// One body-weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Weight in kilograms
    pub weight_kg: f64,
    /// When it was recorded
    pub date: DateTime<Utc>,
}

/// A trainee's fitness profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: Uuid,
    /// Login name (unique)
    pub username: String,
    /// Contact email
    pub email: String,
    /// Height in centimetres
    #[serde(default)]
    pub height_cm: Option<f64>,
    /// Current weight in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Self-reported sex
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u32>,
    /// Weight measurements, oldest first
    #[serde(default)]
    pub weight_history: Vec<WeightEntry>,
    /// Training goals, most important first
    #[serde(default)]
    pub fitness_goals: Vec<FitnessGoal>,
    /// Injuries
    #[serde(default)]
    pub injuries: Vec<Injury>,
    /// Equipment the trainee has access to (empty means unrestricted)
    #[serde(default)]
    pub available_equipment: Vec<String>,
    /// Training days per week
    pub preferred_workout_days: u8,
    /// Session length in minutes
    pub preferred_workout_duration: u32,
    /// Preferred time of day
    #[serde(default)]
    pub preferred_workout_time: Option<String>,
    /// Training experience
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Whether a Hevy API key is stored (the key itself is never serialized)
    #[serde(default)]
    pub has_hevy_api_key: bool,
    /// When the Hevy key was last changed
    #[serde(default)]
    pub hevy_api_key_updated_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile with default training preferences
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            height_cm: None,
            weight_kg: None,
            sex: None,
            age: None,
            weight_history: Vec::new(),
            fitness_goals: Vec::new(),
            injuries: Vec::new(),
            available_equipment: Vec::new(),
            preferred_workout_days: DEFAULT_WORKOUT_DAYS,
            preferred_workout_duration: DEFAULT_WORKOUT_DURATION_MINUTES,
            preferred_workout_time: None,
            experience_level: ExperienceLevel::default(),
            notes: None,
            has_hevy_api_key: false,
            hevy_api_key_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Injuries that still affect training
    pub fn active_injuries(&self) -> impl Iterator<Item = &Injury> {
        self.injuries.iter().filter(|injury| injury.is_active)
    }

    /// Most important goal, if any
    #[must_use]
    pub fn primary_goal(&self) -> Option<FitnessGoal> {
        self.fitness_goals.first().copied()
    }

    /// Record a new body-weight measurement and make it current
    ///
    /// # Errors
    ///
    /// Returns an error if the weight is not a positive finite number
    pub fn record_weight(&mut self, weight_kg: f64, at: DateTime<Utc>) -> AppResult<()> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(AppError::invalid_input("Weight must be a positive number"));
        }
        self.weight_history.push(WeightEntry {
            weight_kg,
            date: at,
        });
        self.weight_kg = Some(weight_kg);
        self.updated_at = at;
        Ok(())
    }
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    /// New email
    pub email: Option<String>,
    /// New height
    pub height_cm: Option<f64>,
    /// New weight (also appended to history)
    pub weight_kg: Option<f64>,
    /// New sex
    pub sex: Option<Sex>,
    /// New age
    pub age: Option<u32>,
    /// Replacement goal list
    pub fitness_goals: Option<Vec<FitnessGoal>>,
    /// Replacement injury list
    pub injuries: Option<Vec<Injury>>,
    /// Replacement equipment list
    pub available_equipment: Option<Vec<String>>,
    /// New training days per week
    pub preferred_workout_days: Option<u8>,
    /// New session length
    pub preferred_workout_duration: Option<u32>,
    /// New preferred time of day
    pub preferred_workout_time: Option<String>,
    /// New experience level
    pub experience_level: Option<ExperienceLevel>,
    /// New notes
    pub notes: Option<String>,
}

impl ProfileUpdate {
    /// Validate and apply this update to a profile
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if any supplied value is out of range; the
    /// profile is left unchanged in that case.
    pub fn apply_to(self, profile: &mut UserProfile) -> AppResult<()> {
        self.validate()?;
        let now = Utc::now();

        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(height) = self.height_cm {
            profile.height_cm = Some(height);
        }
        if let Some(weight) = self.weight_kg {
            profile.record_weight(weight, now)?;
        }
        if let Some(sex) = self.sex {
            profile.sex = Some(sex);
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(goals) = self.fitness_goals {
            profile.fitness_goals = goals;
        }
        if let Some(injuries) = self.injuries {
            profile.injuries = injuries;
        }
        if let Some(equipment) = self.available_equipment {
            profile.available_equipment = equipment
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(days) = self.preferred_workout_days {
            profile.preferred_workout_days = days;
        }
        if let Some(duration) = self.preferred_workout_duration {
            profile.preferred_workout_duration = duration;
        }
        if let Some(time) = self.preferred_workout_time {
            profile.preferred_workout_time = Some(time);
        }
        if let Some(level) = self.experience_level {
            profile.experience_level = level;
        }
        if let Some(notes) = self.notes {
            profile.notes = Some(notes);
        }

        profile.updated_at = now;
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::invalid_input("Email address is invalid"));
            }
        }
        if let Some(days) = self.preferred_workout_days {
            if !(MIN_WORKOUT_DAYS..=MAX_WORKOUT_DAYS).contains(&days) {
                return Err(AppError::invalid_input(format!(
                    "preferred_workout_days must be between {MIN_WORKOUT_DAYS} and {MAX_WORKOUT_DAYS}"
                )));
            }
        }
        if let Some(duration) = self.preferred_workout_duration {
            if !(MIN_WORKOUT_DURATION_MINUTES..=MAX_WORKOUT_DURATION_MINUTES).contains(&duration) {
                return Err(AppError::invalid_input(format!(
                    "preferred_workout_duration must be between {MIN_WORKOUT_DURATION_MINUTES} and {MAX_WORKOUT_DURATION_MINUTES} minutes"
                )));
            }
        }
        if let Some(height) = self.height_cm {
            if !height.is_finite() || height <= 0.0 {
                return Err(AppError::invalid_input("Height must be a positive number"));
            }
        }
        if let Some(weight) = self.weight_kg {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(AppError::invalid_input("Weight must be a positive number"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new("sam", "sam@example.com");
        assert_eq!(profile.preferred_workout_days, 3);
        assert_eq!(profile.preferred_workout_duration, 60);
        assert_eq!(profile.experience_level, ExperienceLevel::Beginner);
        assert!(!profile.has_hevy_api_key);
    }

    #[test]
    fn test_active_injuries_filters_healed() {
        let mut profile = UserProfile::new("sam", "sam@example.com");
        profile.injuries = vec![
            Injury {
                description: "Tweaked shoulder".into(),
                body_part: "shoulder".into(),
                severity: InjurySeverity::Moderate,
                date_injured: None,
                is_active: true,
                notes: None,
            },
            Injury {
                description: "Old ankle sprain".into(),
                body_part: "ankle".into(),
                severity: InjurySeverity::Mild,
                date_injured: None,
                is_active: false,
                notes: None,
            },
        ];

        let active: Vec<_> = profile.active_injuries().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].body_part, "shoulder");
    }

    #[test]
    fn test_update_rejects_out_of_range_days() {
        let mut profile = UserProfile::new("sam", "sam@example.com");
        let update = ProfileUpdate {
            preferred_workout_days: Some(9),
            notes: Some("should not apply".into()),
            ..ProfileUpdate::default()
        };

        assert!(update.apply_to(&mut profile).is_err());
        assert_eq!(profile.preferred_workout_days, 3);
        assert!(profile.notes.is_none());
    }

    #[test]
    fn test_update_weight_appends_history() {
        let mut profile = UserProfile::new("sam", "sam@example.com");
        let update = ProfileUpdate {
            weight_kg: Some(82.5),
            available_equipment: Some(vec![" Barbell ".into(), String::new()]),
            ..ProfileUpdate::default()
        };

        update.apply_to(&mut profile).unwrap();
        assert_eq!(profile.weight_kg, Some(82.5));
        assert_eq!(profile.weight_history.len(), 1);
        assert_eq!(profile.available_equipment, vec!["barbell".to_owned()]);
    }

    #[test]
    fn test_goal_parsing_accepts_labels() {
        assert_eq!(
            "muscle gain".parse::<FitnessGoal>().unwrap(),
            FitnessGoal::MuscleGain
        );
        assert!("bulking".parse::<FitnessGoal>().is_err());
    }
}
