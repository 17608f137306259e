// ABOUTME: Parses model output into a validated routine
// ABOUTME: Tolerates code fences and prose, drops unknown exercise ids, and normalises set values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::constants::routines::UNKNOWN_EXERCISE;
use crate::errors::{AppError, AppResult};
use crate::models::{GeneratedRoutine, Routine, RoutineExercise, RoutineSet, SetType};

const SERVICE: &str = "Routine generator";
const UNTITLED: &str = "Untitled Routine";

fn fence_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*\})\s*```").ok())
        .as_ref()
}

/// The JSON object inside a model reply
///
/// Prefers a fenced block; otherwise takes everything from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(captures) = fence_pattern().and_then(|re| re.captures(text)) {
        if let Some(body) = captures.get(1) {
            return Some(body.as_str());
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// A non-negative number; numeric strings are accepted
fn non_negative(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (number.is_finite() && number >= 0.0).then_some(number)
}

fn non_negative_u32(value: Option<&Value>) -> Option<u32> {
    non_negative(value).map(|n| n.round().min(f64::from(u32::MAX)) as u32)
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn parse_set(value: &Value) -> RoutineSet {
    let set_type = value
        .get("type")
        .or_else(|| value.get("set_type"))
        .and_then(Value::as_str)
        .and_then(|s| serde_json::from_value(Value::String(s.trim().to_lowercase())).ok())
        .unwrap_or(SetType::Normal);

    RoutineSet {
        set_type,
        weight_kg: non_negative(value.get("weight_kg")),
        reps: non_negative_u32(value.get("reps")),
        distance_meters: non_negative(value.get("distance_meters")),
        duration_seconds: non_negative_u32(value.get("duration_seconds")),
        custom_metric: non_negative(value.get("custom_metric")),
    }
}

/// Turn a model reply into a routine
///
/// `candidates` maps the ids offered in the prompt to their titles; `catalog`
/// maps every indexed id to its title. Exercises whose id is in neither are
/// dropped with a warning.
///
/// # Errors
///
/// Returns `EXTERNAL_SERVICE_ERROR` if no JSON object can be found, the
/// `hevy_api.routine` object is missing, or no exercise has a known id
pub fn parse_generated_routine(
    text_reply: &str,
    candidates: &HashMap<String, String>,
    catalog: &HashMap<String, String>,
) -> AppResult<GeneratedRoutine> {
    let body = extract_json_object(text_reply).ok_or_else(|| {
        AppError::external_service(SERVICE, "Model response did not contain a JSON object")
    })?;
    let root: Value = serde_json::from_str(body).map_err(|e| {
        AppError::external_service(SERVICE, format!("Model response is not valid JSON: {e}"))
    })?;

    let routine = root
        .get("hevy_api")
        .and_then(|h| h.get("routine"))
        .filter(|r| r.is_object())
        .ok_or_else(|| {
            AppError::external_service(SERVICE, "Model response is missing hevy_api.routine")
        })?;

    let mut exercises = Vec::new();
    for raw in routine
        .get("exercises")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
    {
        let Some(template_id) = text(raw.get("exercise_template_id")) else {
            warn!("Dropping generated exercise without a template id");
            continue;
        };
        let name = candidates.get(&template_id).or_else(|| catalog.get(&template_id));
        let Some(name) = name.cloned() else {
            warn!(%template_id, "Dropping generated exercise with unknown template id");
            continue;
        };

        exercises.push(RoutineExercise {
            name: Some(if name.is_empty() {
                UNKNOWN_EXERCISE.to_owned()
            } else {
                name
            }),
            exercise_template_id: template_id,
            superset_id: non_negative_u32(raw.get("superset_id")),
            rest_seconds: non_negative_u32(raw.get("rest_seconds")),
            notes: text(raw.get("notes")),
            sets: raw
                .get("sets")
                .and_then(Value::as_array)
                .map(|sets| sets.iter().map(parse_set).collect())
                .unwrap_or_default(),
        });
    }

    if exercises.is_empty() {
        return Err(AppError::external_service(
            SERVICE,
            "Generated routine contained no exercises from the catalog",
        ));
    }

    Ok(GeneratedRoutine {
        routine_description: text(root.get("routine_description")).unwrap_or_default(),
        routine: Routine {
            title: text(routine.get("title")).unwrap_or_else(|| UNTITLED.to_owned()),
            folder_id: None,
            notes: text(routine.get("notes")),
            exercises,
        },
    })
}
