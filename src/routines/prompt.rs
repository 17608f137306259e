// ABOUTME: Routine generation prompt construction
// ABOUTME: Combines the trainee profile, history, and candidate exercises with fixed coaching rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::ScoredWorkout;
use crate::constants::routines::CARDIO_MINUTES_DIVISOR;
use crate::errors::AppResult;
use crate::models::{Exercise, SplitType, UserProfile};
use crate::units::{format_height_cm, format_weight_kg};

/// System message sent with every routine request
pub const TRAINER_SYSTEM_PROMPT: &str = include_str!("prompts/trainer_system.md");

/// Coaching rules and the required response shape
pub const ROUTINE_RULES: &str = include_str!("prompts/routine_rules.md");

/// Everything the prompt is built from
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// The trainee
    pub user: &'a UserProfile,
    /// Weekday being planned
    pub day: &'a str,
    /// Session focus, e.g. `Upper Body`
    pub focus: &'a str,
    /// Split the day belongs to, if planned as part of a folder
    pub split: Option<SplitType>,
    /// Whether the session must include cardio
    pub include_cardio: bool,
    /// Similar past workouts
    pub similar_workouts: &'a [ScoredWorkout],
    /// Exercises the model may choose from
    pub exercises: &'a [Exercise],
    /// Free-text request from the trainee
    pub additional_context: Option<&'a str>,
}

#[derive(Serialize)]
struct CandidateExercise<'a> {
    exercise_template_id: &'a str,
    title: &'a str,
    primary_muscles: &'a [String],
    secondary_muscles: &'a [String],
    equipment: String,
}

fn profile_section(user: &UserProfile) -> String {
    let goals = if user.fitness_goals.is_empty() {
        "general fitness".to_owned()
    } else {
        user.fitness_goals
            .iter()
            .map(crate::models::FitnessGoal::label)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let injuries: Vec<String> = user
        .active_injuries()
        .map(|i| format!("{} ({}, {})", i.description, i.body_part, i.severity.as_str()))
        .collect();
    let unknown = || "not specified".to_owned();

    let mut section = String::from("## Trainee profile\n\n");
    let _ = writeln!(section, "- Experience level: {}", user.experience_level);
    let _ = writeln!(section, "- Fitness goals: {goals}");
    let _ = writeln!(
        section,
        "- Sex: {}",
        user.sex.map_or_else(unknown, |s| s.as_str().to_owned())
    );
    let _ = writeln!(
        section,
        "- Age: {}",
        user.age.map_or_else(unknown, |a| a.to_string())
    );
    let _ = writeln!(
        section,
        "- Height: {}",
        user.height_cm.map_or_else(unknown, format_height_cm)
    );
    let _ = writeln!(
        section,
        "- Weight: {}",
        user.weight_kg.map_or_else(unknown, format_weight_kg)
    );
    let _ = writeln!(
        section,
        "- Preferred workout duration: {} minutes",
        user.preferred_workout_duration
    );
    if !user.available_equipment.is_empty() {
        let _ = writeln!(
            section,
            "- Available equipment: {}",
            user.available_equipment.join(", ")
        );
    }
    let _ = writeln!(
        section,
        "- Active injuries: {}",
        if injuries.is_empty() {
            "None".to_owned()
        } else {
            injuries.join("; ")
        }
    );
    section
}

fn history_section(workouts: &[ScoredWorkout]) -> String {
    if workouts.is_empty() {
        return "## Similar past workouts\n\nNo workout history yet.\n".to_owned();
    }
    let mut section = String::from("## Similar past workouts\n\n");
    for workout in workouts {
        let _ = writeln!(
            section,
            "- {} ({}, {} minutes, {} exercises): {}",
            workout.title,
            workout.start_time.format("%Y-%m-%d"),
            workout.duration_minutes,
            workout.exercise_count,
            workout.document
        );
    }
    section
}

/// Build the user message for a single-day routine
///
/// # Errors
///
/// Returns a serialization error if the exercise list cannot be rendered
pub fn build_routine_prompt(ctx: &PromptContext<'_>) -> AppResult<String> {
    let candidates: Vec<CandidateExercise<'_>> = ctx
        .exercises
        .iter()
        .map(|e| CandidateExercise {
            exercise_template_id: &e.id,
            title: &e.title,
            primary_muscles: &e.primary_muscles,
            secondary_muscles: &e.secondary_muscles,
            equipment: e.equipment_label(),
        })
        .collect();
    let exercises_json = serde_json::to_string_pretty(&candidates)?;

    let mut prompt = format!(
        "Create a {} workout routine for {} suited to a {} level trainee.\n\n",
        ctx.focus, ctx.day, ctx.user.experience_level
    );
    prompt.push_str(&profile_section(ctx.user));
    prompt.push('\n');

    prompt.push_str("## Session\n\n");
    let _ = writeln!(prompt, "- Day: {}", ctx.day);
    let _ = writeln!(prompt, "- Focus: {}", ctx.focus);
    if let Some(split) = ctx.split {
        let _ = writeln!(prompt, "- Workout split: {}", split.label());
    }
    if let Some(extra) = ctx.additional_context.filter(|c| !c.trim().is_empty()) {
        let _ = writeln!(prompt, "- Trainee request: {}", extra.trim());
    }
    prompt.push('\n');

    prompt.push_str(&history_section(ctx.similar_workouts));
    prompt.push('\n');

    let _ = write!(
        prompt,
        "## Available exercises\n\n```json\n{exercises_json}\n```\n\n"
    );

    prompt.push_str(ROUTINE_RULES);
    if ctx.include_cardio {
        let _ = write!(
            prompt,
            "\n- Include at least {} minutes of cardio using exercises from the list above.\n",
            ctx.user.preferred_workout_duration / CARDIO_MINUTES_DIVISOR
        );
    }
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FitnessGoal, Injury, InjurySeverity};

    fn user() -> UserProfile {
        let mut user = UserProfile::new("sam", "sam@example.com");
        user.fitness_goals = vec![FitnessGoal::MuscleGain];
        user.preferred_workout_duration = 50;
        user.injuries = vec![
            Injury {
                description: "Tennis elbow".to_owned(),
                body_part: "elbow".to_owned(),
                severity: InjurySeverity::Mild,
                date_injured: None,
                is_active: true,
                notes: None,
            },
            Injury {
                description: "Old ankle sprain".to_owned(),
                body_part: "ankle".to_owned(),
                severity: InjurySeverity::Moderate,
                date_injured: None,
                is_active: false,
                notes: None,
            },
        ];
        user
    }

    #[test]
    fn test_prompt_contents() {
        let user = user();
        let exercises = vec![Exercise::new(
            "79D0BB3A",
            "Bench Press (Barbell)",
            &["chest"],
            &["triceps"],
            &["barbell"],
        )];
        let prompt = build_routine_prompt(&PromptContext {
            user: &user,
            day: "Monday",
            focus: "Upper Body",
            split: Some(SplitType::UpperLower),
            include_cardio: true,
            similar_workouts: &[],
            exercises: &exercises,
            additional_context: None,
        })
        .unwrap();

        assert!(prompt.contains("Create a Upper Body workout routine for Monday"));
        assert!(prompt.contains("- Fitness goals: muscle gain"));
        assert!(prompt.contains("Tennis elbow (elbow, mild)"));
        assert!(!prompt.contains("Old ankle sprain"));
        assert!(prompt.contains("\"exercise_template_id\": \"79D0BB3A\""));
        assert!(prompt.contains("Upper/Lower"));
        assert!(prompt.contains("at least 5 minutes of cardio"));
        assert!(prompt.contains("\"hevy_api\""));
    }

    #[test]
    fn test_no_injuries_and_no_cardio() {
        let mut user = user();
        user.injuries.clear();
        let prompt = build_routine_prompt(&PromptContext {
            user: &user,
            day: "Friday",
            focus: "Full Body",
            split: None,
            include_cardio: false,
            similar_workouts: &[],
            exercises: &[],
            additional_context: Some("keep it short"),
        })
        .unwrap();

        assert!(prompt.contains("- Active injuries: None"));
        assert!(!prompt.contains("minutes of cardio"));
        assert!(prompt.contains("Trainee request: keep it short"));
        assert!(prompt.contains("No workout history yet."));
    }
}
