// ABOUTME: Conversions between Hevy payloads and Spotter domain models
// ABOUTME: Applies Hevy's routine rules such as default rest and null supersets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use spotter_core::constants::routines::DEFAULT_REST_SECONDS;
use spotter_core::models::{Exercise, Routine, Workout, WorkoutExercise, WorkoutSet};
use uuid::Uuid;

use crate::models::{
    HevyExerciseTemplate, HevySet, HevyWorkout, HevyWorkoutExercise, RoutineBody,
    RoutineExerciseBody, RoutinePayload, WorkoutBody, WorkoutExerciseBody, WorkoutPayload,
};

const NO_EQUIPMENT: &str = "none";

impl From<HevyExerciseTemplate> for Exercise {
    fn from(template: HevyExerciseTemplate) -> Self {
        let equipment = template
            .equipment
            .filter(|e| !e.is_empty() && e != NO_EQUIPMENT)
            .into_iter()
            .collect();

        Self {
            id: template.id,
            title: template.title,
            primary_muscles: template.primary_muscle_group.into_iter().collect(),
            secondary_muscles: template.secondary_muscle_groups,
            equipment,
            exercise_type: template
                .exercise_type
                .unwrap_or_else(|| "weight_reps".to_owned()),
            is_custom: template.is_custom,
            owner_user_id: None,
        }
    }
}

impl From<HevySet> for WorkoutSet {
    fn from(set: HevySet) -> Self {
        Self {
            index: set.index,
            set_type: set.set_type,
            weight_kg: set.weight_kg,
            reps: set.reps,
            distance_meters: set.distance_meters,
            duration_seconds: set.duration_seconds,
            rpe: set.rpe,
            custom_metric: set.custom_metric,
        }
    }
}

impl From<&WorkoutSet> for HevySet {
    fn from(set: &WorkoutSet) -> Self {
        Self {
            index: set.index,
            set_type: set.set_type,
            weight_kg: set.weight_kg,
            reps: set.reps,
            distance_meters: set.distance_meters,
            duration_seconds: set.duration_seconds,
            rpe: set.rpe,
            custom_metric: set.custom_metric,
        }
    }
}

impl From<HevyWorkoutExercise> for WorkoutExercise {
    fn from(exercise: HevyWorkoutExercise) -> Self {
        Self {
            index: exercise.index,
            title: exercise.title,
            notes: exercise.notes.filter(|n| !n.is_empty()),
            exercise_template_id: exercise.exercise_template_id,
            superset_id: exercise.superset_id,
            sets: exercise.sets.into_iter().map(WorkoutSet::from).collect(),
        }
    }
}

impl HevyWorkout {
    /// Convert into a stored workout owned by `user_id`
    #[must_use]
    pub fn into_workout(self, user_id: Uuid) -> Workout {
        let now = Utc::now();
        let title = if self.title.trim().is_empty() {
            "Untitled Workout".to_owned()
        } else {
            self.title
        };

        Workout {
            id: Uuid::new_v4(),
            user_id,
            hevy_id: Some(self.id),
            title,
            description: self.description.filter(|d| !d.is_empty()),
            start_time: self.start_time,
            end_time: self.end_time,
            exercises: self
                .exercises
                .into_iter()
                .map(WorkoutExercise::from)
                .collect(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
            last_synced: Some(now),
        }
    }
}

impl From<&Workout> for WorkoutPayload {
    fn from(workout: &Workout) -> Self {
        Self {
            workout: WorkoutBody {
                title: workout.title.clone(),
                description: workout.description.clone(),
                start_time: workout.start_time,
                end_time: workout.end_time,
                is_private: false,
                exercises: workout
                    .exercises
                    .iter()
                    .map(|exercise| WorkoutExerciseBody {
                        exercise_template_id: exercise.exercise_template_id.clone(),
                        superset_id: exercise.superset_id,
                        notes: exercise.notes.clone(),
                        sets: exercise.sets.iter().map(HevySet::from).collect(),
                    })
                    .collect(),
            },
        }
    }
}

impl From<&Routine> for RoutinePayload {
    /// Hevy rejects routine supersets created over the API, so they are dropped
    fn from(routine: &Routine) -> Self {
        Self {
            routine: RoutineBody {
                title: routine.title.clone(),
                folder_id: routine.folder_id,
                notes: routine.notes.clone().unwrap_or_default(),
                exercises: routine
                    .exercises
                    .iter()
                    .map(|exercise| RoutineExerciseBody {
                        exercise_template_id: exercise.exercise_template_id.clone(),
                        superset_id: None,
                        rest_seconds: exercise.rest_seconds.unwrap_or(DEFAULT_REST_SECONDS),
                        notes: exercise.notes.clone().unwrap_or_default(),
                        sets: exercise.sets.clone(),
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_core::models::{RoutineExercise, RoutineSet};

    #[test]
    fn test_template_without_equipment_is_bodyweight() {
        let template = HevyExerciseTemplate {
            id: "392887AA".into(),
            title: "Push Up".into(),
            exercise_type: Some("reps_only".into()),
            primary_muscle_group: Some("chest".into()),
            secondary_muscle_groups: vec!["triceps".into()],
            equipment: Some("none".into()),
            is_custom: false,
        };

        let exercise = Exercise::from(template);
        assert!(exercise.equipment.is_empty());
        assert_eq!(exercise.primary_muscles, vec!["chest".to_owned()]);
        assert_eq!(exercise.exercise_type, "reps_only");
    }

    #[test]
    fn test_routine_payload_defaults() {
        let routine = Routine {
            title: "Monday - Upper Body".into(),
            folder_id: Some(7),
            notes: None,
            exercises: vec![RoutineExercise {
                exercise_template_id: "79D0BB3A".into(),
                name: Some("Bench Press (Barbell)".into()),
                superset_id: Some(1),
                rest_seconds: None,
                notes: None,
                sets: vec![RoutineSet::default()],
            }],
        };

        let payload = RoutinePayload::from(&routine);
        let exercise = &payload.routine.exercises[0];
        assert_eq!(exercise.rest_seconds, 90);
        assert!(exercise.superset_id.is_none());
        assert_eq!(payload.routine.folder_id, Some(7));
        assert_eq!(payload.routine.notes, "");
    }
}
