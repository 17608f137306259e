// ABOUTME: Exercise catalog entry and muscle-group category mapping
// ABOUTME: Produces the text documents embedded by the exercise similarity index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::muscles::{BODYWEIGHT, CATEGORY_MAP};

fn default_exercise_type() -> String {
    "weight_reps".to_owned()
}

/// Broad muscle-group category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    /// Back
    Back,
    /// Chest
    Chest,
    /// Shoulders
    Shoulders,
    /// Arms
    Arms,
    /// Legs
    Legs,
    /// Core
    Core,
    /// Cardio
    Cardio,
}

impl MuscleGroup {
    /// Category for a specific muscle name, if it is a known muscle
    #[must_use]
    pub fn category_of(muscle: &str) -> Option<Self> {
        let key = muscle.trim().to_lowercase();
        CATEGORY_MAP
            .iter()
            .find(|(specific, _)| *specific == key)
            .and_then(|(_, category)| Self::from_name(category))
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "back" => Some(Self::Back),
            "chest" => Some(Self::Chest),
            "shoulders" => Some(Self::Shoulders),
            "arms" => Some(Self::Arms),
            "legs" => Some(Self::Legs),
            "core" => Some(Self::Core),
            "cardio" => Some(Self::Cardio),
            _ => None,
        }
    }

    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Chest => "chest",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Legs => "legs",
            Self::Core => "core",
            Self::Cardio => "cardio",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category name for a muscle; unknown muscles map to themselves
#[must_use]
pub fn muscle_category(muscle: &str) -> String {
    MuscleGroup::category_of(muscle).map_or_else(
        || muscle.trim().to_lowercase(),
        |group| group.as_str().to_owned(),
    )
}

/// Specific muscles followed by their categories, order-preserving and de-duplicated
fn expand_muscles(muscles: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::with_capacity(muscles.len() * 2);
    for muscle in muscles {
        for candidate in [muscle.trim().to_lowercase(), muscle_category(muscle)] {
            if !candidate.is_empty() && !expanded.contains(&candidate) {
                expanded.push(candidate);
            }
        }
    }
    expanded
}

/// A catalog exercise keyed by its Hevy exercise template id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Hevy exercise template id
    pub id: String,
    /// Display name
    pub title: String,
    /// Primary muscles worked
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    /// Secondary muscles worked
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    /// Equipment required (empty means bodyweight)
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Hevy exercise type, e.g. `weight_reps` or `duration`
    #[serde(default = "default_exercise_type")]
    pub exercise_type: String,
    /// Whether this is a user-created template
    #[serde(default)]
    pub is_custom: bool,
    /// Owner of a custom exercise
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
}

impl Exercise {
    /// Build a base catalog exercise
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        primary_muscles: &[&str],
        secondary_muscles: &[&str],
        equipment: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect();
        Self {
            id: id.into(),
            title: title.into(),
            primary_muscles: owned(primary_muscles),
            secondary_muscles: owned(secondary_muscles),
            equipment: owned(equipment),
            exercise_type: default_exercise_type(),
            is_custom: false,
            owner_user_id: None,
        }
    }

    /// Primary muscles with their categories added
    #[must_use]
    pub fn expanded_primary(&self) -> Vec<String> {
        expand_muscles(&self.primary_muscles)
    }

    /// Secondary muscles with their categories added
    #[must_use]
    pub fn expanded_secondary(&self) -> Vec<String> {
        expand_muscles(&self.secondary_muscles)
    }

    /// Equipment list, or `bodyweight` when none is needed
    #[must_use]
    pub fn equipment_label(&self) -> String {
        if self.equipment.is_empty() {
            BODYWEIGHT.to_owned()
        } else {
            self.equipment.join(", ")
        }
    }

    /// Whether this exercise can be done with the given equipment (case-insensitive)
    #[must_use]
    pub fn uses_equipment(&self, equipment: &str) -> bool {
        let wanted = equipment.trim().to_lowercase();
        if wanted == BODYWEIGHT {
            return self.equipment.is_empty();
        }
        self.equipment.iter().any(|e| e.to_lowercase() == wanted)
    }

    /// Text embedded for similarity search
    #[must_use]
    pub fn search_document(&self) -> String {
        format!(
            "{} - Primary muscles: {} - Secondary muscles: {} - Equipment: {}",
            self.title,
            self.expanded_primary().join(", "),
            self.expanded_secondary().join(", "),
            self.equipment_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(MuscleGroup::category_of("lats"), Some(MuscleGroup::Back));
        assert_eq!(MuscleGroup::category_of("Quadriceps"), Some(MuscleGroup::Legs));
        assert_eq!(muscle_category("neck"), "neck");
    }

    #[test]
    fn test_search_document_expands_categories() {
        let exercise = Exercise::new(
            "79D0BB3A",
            "Bench Press (Barbell)",
            &["chest"],
            &["triceps", "shoulders"],
            &["barbell"],
        );
        assert_eq!(
            exercise.search_document(),
            "Bench Press (Barbell) - Primary muscles: chest - Secondary muscles: triceps, arms, shoulders - Equipment: barbell"
        );
    }

    #[test]
    fn test_bodyweight_label() {
        let exercise = Exercise::new("1", "Push Up", &["chest"], &[], &[]);
        assert_eq!(exercise.equipment_label(), "bodyweight");
        assert!(exercise.uses_equipment("Bodyweight"));
        assert!(!exercise.uses_equipment("barbell"));
    }
}
