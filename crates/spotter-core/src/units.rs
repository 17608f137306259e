// ABOUTME: Metric and imperial conversions for body metrics and training loads
// ABOUTME: Storage is always metric; these helpers only convert for display and input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::AppError;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453_592_37;
/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;
const INCHES_PER_FOOT: f64 = 12.0;

/// Convert inches to centimetres
#[must_use]
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Convert centimetres to inches
#[must_use]
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Convert pounds to kilograms
#[must_use]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

/// Convert kilograms to pounds
#[must_use]
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg / KG_PER_LB
}

/// Render a height as feet and inches, e.g. `5'10.0"`
#[must_use]
pub fn format_height_cm(cm: f64) -> String {
    let total_inches = (cm_to_inches(cm) * 10.0).round() / 10.0;
    let feet = (total_inches / INCHES_PER_FOOT).floor();
    let inches = total_inches - feet * INCHES_PER_FOOT;
    format!("{feet:.0}'{inches:.1}\"")
}

/// Render a weight in pounds, e.g. `165.3 lbs`
#[must_use]
pub fn format_weight_kg(kg: f64) -> String {
    format!("{:.1} lbs", kg_to_lbs(kg))
}

/// Display unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Kilograms and centimetres
    #[default]
    Metric,
    /// Pounds and inches
    Imperial,
}

impl UnitSystem {
    /// Weight unit suffix
    #[must_use]
    pub const fn weight_label(&self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }

    /// Convert a stored kilogram value into this system
    #[must_use]
    pub fn display_weight(&self, kg: f64) -> f64 {
        match self {
            Self::Metric => kg,
            Self::Imperial => kg_to_lbs(kg),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "kg" => Ok(Self::Metric),
            "imperial" | "lbs" => Ok(Self::Imperial),
            other => Err(AppError::invalid_input(format!(
                "Unknown unit system: {other}"
            ))),
        }
    }
}
