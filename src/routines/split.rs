// ABOUTME: Workout split selection, weekly schedules, and planning date ranges
// ABOUTME: Decides which days to train and what each day focuses on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};

use crate::constants::profile::{MAX_WORKOUT_DAYS, MIN_WORKOUT_DAYS};
use crate::errors::{AppError, AppResult};
use crate::models::{ExperienceLevel, Period, SplitPreference, SplitType};

/// Weekday names in calendar order
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const FULL_BODY: &str = "Full Body";
const UPPER_BODY: &str = "Upper Body";
const LOWER_BODY: &str = "Lower Body";
const PUSH: &str = "Push (Chest, Shoulders, Triceps)";
const PULL: &str = "Pull (Back, Biceps)";
const LEGS_ABS: &str = "Legs and Abdominals";

/// One scheduled training day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDay {
    /// Weekday name
    pub day: &'static str,
    /// What the session trains
    pub focus: &'static str,
}

/// Resolve the split to use
///
/// `Auto` picks full body for beginners, upper/lower for up to four days,
/// and push/pull/legs beyond that.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if `days` is outside 1..=7
pub fn determine_workout_split(
    days: u8,
    level: ExperienceLevel,
    preferred: SplitPreference,
) -> AppResult<SplitType> {
    if !(MIN_WORKOUT_DAYS..=MAX_WORKOUT_DAYS).contains(&days) {
        return Err(AppError::invalid_input(format!(
            "Training days per week must be between {MIN_WORKOUT_DAYS} and {MAX_WORKOUT_DAYS}, got {days}"
        )));
    }

    Ok(match preferred {
        SplitPreference::Fixed(split) => split,
        SplitPreference::Auto if level == ExperienceLevel::Beginner => SplitType::FullBody,
        SplitPreference::Auto if days <= 4 => SplitType::UpperLower,
        SplitPreference::Auto => SplitType::PushPull,
    })
}

/// Base slots followed by the extra slots used when training more often
fn slots(split: SplitType) -> Vec<ScheduledDay> {
    let day = |day, focus| ScheduledDay { day, focus };
    match split {
        SplitType::FullBody => vec![
            day("Monday", FULL_BODY),
            day("Wednesday", FULL_BODY),
            day("Friday", FULL_BODY),
            day("Tuesday", FULL_BODY),
            day("Thursday", FULL_BODY),
            day("Saturday", FULL_BODY),
        ],
        SplitType::UpperLower => vec![
            day("Monday", UPPER_BODY),
            day("Wednesday", LOWER_BODY),
            day("Friday", UPPER_BODY),
            day("Tuesday", LOWER_BODY),
            day("Thursday", UPPER_BODY),
            day("Saturday", LOWER_BODY),
        ],
        SplitType::PushPull => vec![
            day("Monday", PUSH),
            day("Tuesday", PULL),
            day("Wednesday", LEGS_ABS),
            day("Thursday", PUSH),
            day("Friday", PULL),
            day("Saturday", LEGS_ABS),
        ],
    }
}

fn weekday_position(day: &str) -> usize {
    WEEKDAYS
        .iter()
        .position(|d| *d == day)
        .unwrap_or(WEEKDAYS.len())
}

/// Training days for a split, in weekday order
///
/// Takes the first `days` slots of the split; asking for more days than the
/// split defines yields every slot.
#[must_use]
pub fn split_schedule(split: SplitType, days: u8) -> Vec<ScheduledDay> {
    let mut schedule = slots(split);
    schedule.truncate(usize::from(days));
    schedule.sort_by_key(|slot| weekday_position(slot.day));
    schedule
}

/// `YYYY-MM-DD to YYYY-MM-DD` covering `period` from `now`
#[must_use]
pub fn date_range(period: Period, now: DateTime<Utc>) -> String {
    let end = now + Duration::days(period.days());
    format!("{} to {}", now.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn focuses(schedule: &[ScheduledDay]) -> Vec<(&str, &str)> {
        schedule.iter().map(|s| (s.day, s.focus)).collect()
    }

    #[test]
    fn test_auto_split_selection() {
        let auto = SplitPreference::Auto;
        assert_eq!(
            determine_workout_split(5, ExperienceLevel::Beginner, auto).unwrap(),
            SplitType::FullBody
        );
        assert_eq!(
            determine_workout_split(4, ExperienceLevel::Intermediate, auto).unwrap(),
            SplitType::UpperLower
        );
        assert_eq!(
            determine_workout_split(5, ExperienceLevel::Advanced, auto).unwrap(),
            SplitType::PushPull
        );
        assert_eq!(
            determine_workout_split(
                2,
                ExperienceLevel::Beginner,
                SplitPreference::Fixed(SplitType::PushPull)
            )
            .unwrap(),
            SplitType::PushPull
        );
    }

    #[test]
    fn test_days_out_of_range_rejected() {
        assert!(determine_workout_split(0, ExperienceLevel::Beginner, SplitPreference::Auto).is_err());
        assert!(determine_workout_split(8, ExperienceLevel::Beginner, SplitPreference::Auto).is_err());
    }

    #[test]
    fn test_upper_lower_four_days_in_weekday_order() {
        let schedule = split_schedule(SplitType::UpperLower, 4);
        assert_eq!(
            focuses(&schedule),
            vec![
                ("Monday", UPPER_BODY),
                ("Tuesday", LOWER_BODY),
                ("Wednesday", LOWER_BODY),
                ("Friday", UPPER_BODY),
            ]
        );
    }

    #[test]
    fn test_schedule_truncated_and_capped() {
        assert_eq!(split_schedule(SplitType::FullBody, 2).len(), 2);
        assert_eq!(
            focuses(&split_schedule(SplitType::PushPull, 3)),
            vec![("Monday", PUSH), ("Tuesday", PULL), ("Wednesday", LEGS_ABS)]
        );
        assert_eq!(split_schedule(SplitType::PushPull, 7).len(), 6);
    }

    #[test]
    fn test_date_range() {
        let now = Utc.with_ymd_and_hms(2025, 1, 28, 9, 0, 0).unwrap();
        assert_eq!(date_range(Period::Week, now), "2025-01-28 to 2025-02-04");
        assert_eq!(date_range(Period::Month, now), "2025-01-28 to 2025-02-27");
    }
}
