// ABOUTME: Built-in catalog of common Hevy exercise templates
// ABOUTME: Seeds the exercise store so search works before the first Hevy sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::info;

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::Exercise;

type Entry = (
    &'static str,
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
    &'static str,
);

/// `(template id, title, primary, secondary, equipment, exercise type)`
const CATALOG: &[Entry] = &[
    // Chest
    ("79D0BB3A", "Bench Press (Barbell)", &["chest"], &["triceps", "shoulders"], &["barbell"], "weight_reps"),
    ("3601968B", "Bench Press (Dumbbell)", &["chest"], &["triceps", "shoulders"], &["dumbbell"], "weight_reps"),
    ("50DFDFAB", "Incline Bench Press (Barbell)", &["chest"], &["shoulders", "triceps"], &["barbell"], "weight_reps"),
    ("07B38369", "Incline Bench Press (Dumbbell)", &["chest"], &["shoulders", "triceps"], &["dumbbell"], "weight_reps"),
    ("12017185", "Chest Fly (Dumbbell)", &["chest"], &["shoulders"], &["dumbbell"], "weight_reps"),
    ("651F844C", "Cable Fly Crossovers", &["chest"], &["shoulders"], &["machine"], "weight_reps"),
    ("392887AA", "Push Up", &["chest"], &["triceps", "shoulders"], &[], "bodyweight_reps"),
    ("E644F828", "Chest Dip", &["chest"], &["triceps", "shoulders"], &[], "bodyweight_reps"),
    // Back
    ("C6272009", "Deadlift (Barbell)", &["lower_back"], &["glutes", "hamstrings", "traps"], &["barbell"], "weight_reps"),
    ("55E6546F", "Bent Over Row (Barbell)", &["upper_back"], &["lats", "biceps"], &["barbell"], "weight_reps"),
    ("F1E57334", "Dumbbell Row", &["upper_back"], &["lats", "biceps"], &["dumbbell"], "weight_reps"),
    ("1B2B1E7C", "Pull Up", &["lats"], &["biceps", "upper_back"], &[], "bodyweight_reps"),
    ("29083183", "Chin Up", &["lats"], &["biceps"], &[], "bodyweight_reps"),
    ("6A6C31A5", "Lat Pulldown (Cable)", &["lats"], &["biceps", "upper_back"], &["machine"], "weight_reps"),
    ("F1D60854", "Seated Cable Row - V Grip (Cable)", &["upper_back"], &["lats", "biceps"], &["machine"], "weight_reps"),
    ("ABEC557F", "Shrug (Dumbbell)", &["traps"], &["forearms"], &["dumbbell"], "weight_reps"),
    ("2A48E443", "Back Extension (Hyperextension)", &["lower_back"], &["glutes", "hamstrings"], &[], "bodyweight_reps"),
    // Shoulders
    ("7B8D84E8", "Overhead Press (Barbell)", &["shoulders"], &["triceps"], &["barbell"], "weight_reps"),
    ("6AC96645", "Shoulder Press (Dumbbell)", &["shoulders"], &["triceps"], &["dumbbell"], "weight_reps"),
    ("422B08F1", "Lateral Raise (Dumbbell)", &["shoulders"], &[], &["dumbbell"], "weight_reps"),
    ("BE640BA0", "Face Pull", &["shoulders"], &["upper_back", "traps"], &["machine"], "weight_reps"),
    ("E5988A0A", "Rear Delt Reverse Fly (Dumbbell)", &["shoulders"], &["upper_back"], &["dumbbell"], "weight_reps"),
    // Arms
    ("37FCC2BB", "Bicep Curl (Dumbbell)", &["biceps"], &["forearms"], &["dumbbell"], "weight_reps"),
    ("A5AC6449", "Bicep Curl (Barbell)", &["biceps"], &["forearms"], &["barbell"], "weight_reps"),
    ("3BC06AD3", "21s Bicep Curl", &["biceps"], &["forearms"], &["barbell"], "weight_reps"),
    ("7E3BC8B6", "Hammer Curl (Dumbbell)", &["biceps"], &["forearms"], &["dumbbell"], "weight_reps"),
    ("94B7239B", "Triceps Pushdown", &["triceps"], &[], &["machine"], "weight_reps"),
    ("B5EFBF9C", "Skullcrusher (Barbell)", &["triceps"], &[], &["barbell"], "weight_reps"),
    ("35B51B87", "Triceps Dip", &["triceps"], &["chest", "shoulders"], &[], "bodyweight_reps"),
    ("A1A7E1F0", "Wrist Curl (Barbell)", &["forearms"], &[], &["barbell"], "weight_reps"),
    // Legs
    ("D04AC939", "Squat (Barbell)", &["quadriceps"], &["glutes", "hamstrings", "lower_back"], &["barbell"], "weight_reps"),
    ("B8127AD1", "Goblet Squat", &["quadriceps"], &["glutes"], &["kettlebell"], "weight_reps"),
    ("C7973E0E", "Leg Press (Machine)", &["quadriceps"], &["glutes", "hamstrings"], &["machine"], "weight_reps"),
    ("2B4B7310", "Romanian Deadlift (Barbell)", &["hamstrings"], &["glutes", "lower_back"], &["barbell"], "weight_reps"),
    ("B537D09F", "Lunge (Dumbbell)", &["quadriceps"], &["glutes", "hamstrings"], &["dumbbell"], "weight_reps"),
    ("B5D3A742", "Bulgarian Split Squat", &["quadriceps"], &["glutes", "hamstrings"], &["dumbbell"], "weight_reps"),
    ("75A4F6C4", "Leg Extension (Machine)", &["quadriceps"], &[], &["machine"], "weight_reps"),
    ("11A123F3", "Seated Leg Curl (Machine)", &["hamstrings"], &[], &["machine"], "weight_reps"),
    ("D57C2EC7", "Hip Thrust (Barbell)", &["glutes"], &["hamstrings"], &["barbell"], "weight_reps"),
    ("06745E58", "Standing Calf Raise (Machine)", &["calves"], &[], &["machine"], "weight_reps"),
    ("91AF29E0", "Walking Lunge", &["quadriceps"], &["glutes", "hamstrings"], &[], "bodyweight_reps"),
    // Core
    ("C6C9B8A0", "Plank", &["abdominals"], &["obliques", "shoulders"], &[], "duration"),
    ("DCF3B31B", "Crunch", &["abdominals"], &[], &[], "bodyweight_reps"),
    ("F8356514", "Hanging Leg Raise", &["abdominals"], &["obliques", "forearms"], &[], "bodyweight_reps"),
    ("99D5F10E", "Russian Twist (Weighted)", &["obliques"], &["abdominals"], &["plate"], "weight_reps"),
    ("0A5B8C5F", "Cable Crunch", &["abdominals"], &[], &["machine"], "weight_reps"),
    ("23A48484", "Ab Wheel", &["abdominals"], &["lower_back", "shoulders"], &["other"], "bodyweight_reps"),
    // Full body and conditioning
    ("F8A0FCCA", "Kettlebell Swing", &["glutes"], &["hamstrings", "lower_back", "shoulders"], &["kettlebell"], "weight_reps"),
    ("D8F7F851", "Burpee", &["quadriceps"], &["chest", "shoulders", "abdominals"], &[], "bodyweight_reps"),
    // Cardio
    ("243710DE", "Treadmill", &["cardio"], &["legs"], &["machine"], "distance_duration"),
    ("AC1BB830", "Running", &["cardio"], &["legs"], &[], "distance_duration"),
    ("D8F7F8AA", "Cycling", &["cardio"], &["quadriceps"], &["machine"], "distance_duration"),
    ("0222DB42", "Rowing Machine", &["cardio"], &["upper_back", "legs"], &["machine"], "distance_duration"),
    ("BB3A72B7", "Stair Machine (Floors)", &["cardio"], &["glutes", "calves"], &["machine"], "duration"),
    ("3303376C", "Jump Rope", &["cardio"], &["calves"], &["other"], "duration"),
    ("1C34A172", "Elliptical Trainer", &["cardio"], &["legs"], &["machine"], "distance_duration"),
];

/// The built-in exercise catalog
#[must_use]
pub fn builtin_exercises() -> Vec<Exercise> {
    CATALOG
        .iter()
        .map(|(id, title, primary, secondary, equipment, exercise_type)| {
            let mut exercise = Exercise::new(*id, *title, primary, secondary, equipment);
            (*exercise_type).clone_into(&mut exercise.exercise_type);
            exercise
        })
        .collect()
}

/// Persist the built-in catalog when no base exercises are stored yet
///
/// Returns the number of exercises written; zero when the store was already populated.
///
/// # Errors
///
/// Returns an error if the database query or write fails
pub async fn ensure_catalog(db: &Database) -> AppResult<usize> {
    if db.base_exercises_bootstrapped().await? {
        return Ok(0);
    }

    let exercises = builtin_exercises();
    db.save_exercises(&exercises, None).await?;
    info!(
        count = exercises.len(),
        "Seeded exercise store with built-in catalog"
    );
    Ok(exercises.len())
}
