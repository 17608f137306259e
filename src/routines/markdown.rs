// ABOUTME: Markdown rendering of generated routines
// ABOUTME: Shows weights in the trainee's preferred unit system
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use crate::constants::routines::UNKNOWN_EXERCISE;
use crate::models::{Routine, RoutineFolder, RoutineSet};
use crate::units::UnitSystem;

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn format_set(set: &RoutineSet, units: UnitSystem) -> String {
    let mut parts = Vec::new();
    if let Some(reps) = set.reps {
        parts.push(format!("{reps} reps"));
    }
    match set.weight_kg {
        Some(kg) if kg > 0.0 => parts.push(format!(
            "{:.1}{}",
            units.display_weight(kg),
            units.weight_label()
        )),
        Some(_) => parts.push("Bodyweight".to_owned()),
        None => {}
    }
    if let Some(distance) = set.distance_meters {
        parts.push(format!("{distance}m"));
    }
    if let Some(seconds) = set.duration_seconds.filter(|s| *s > 0) {
        parts.push(format!("{seconds}s"));
    }
    format!("{}: {}", capitalize(set.set_type.as_str()), parts.join(", "))
}

/// Render a routine as markdown
#[must_use]
pub fn format_routine_markdown(routine: &Routine, units: UnitSystem) -> String {
    let mut out = format!("## {}\n\n", routine.title);
    if let Some(notes) = routine.notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(out, "*{notes}*\n\n");
    }

    for exercise in &routine.exercises {
        let name = exercise.name.as_deref().unwrap_or(UNKNOWN_EXERCISE);
        let _ = writeln!(out, "### {name}");
        if let Some(notes) = exercise.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = write!(out, "*{notes}*\n\n");
        }

        out.push_str("**Sets:**\n");
        for (number, set) in exercise.sets.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", number + 1, format_set(set, units));
        }

        match exercise.rest_seconds.filter(|s| *s > 0) {
            Some(rest) => {
                let _ = write!(out, "*Rest: {rest} seconds*\n\n");
            }
            None => out.push('\n'),
        }
    }
    out
}

/// Render every routine in a folder under a folder heading
#[must_use]
pub fn format_folder_markdown(folder: &RoutineFolder, units: UnitSystem) -> String {
    let mut out = format!("# {}\n\n", folder.name);
    if !folder.description.is_empty() {
        let _ = write!(out, "{}\n\n", folder.description);
    }
    let _ = write!(
        out,
        "*{} split, {} days per week, {}*\n\n",
        folder.split_type.label(),
        folder.days_per_week,
        folder.date_range
    );
    for routine in &folder.routines {
        out.push_str(&format_routine_markdown(routine, units));
    }
    out
}
