//! Core domain types for the activity ledgers.
//!
//! This module defines the records each tracker persists and the derived
//! metrics the ledgers hand back:
//! - Exercise entries, presets and daily totals
//! - Water settings, daily state and progress
//! - Weight entries and trend metrics

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for exercise and weight entries (epoch milliseconds, bumped
/// past any existing id on collision)
pub type EntryId = i64;

// ============================================================================
// Exercise Types
// ============================================================================

/// A logged exercise for one day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub calories_burned: u32,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A named activity with a fixed burn rate
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExercisePreset {
    pub name: &'static str,
    pub calories_per_minute: u32,
}

/// Sums over one day's exercise entries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseTotals {
    pub total_calories_burned: u64,
    pub total_duration_minutes: u64,
}

impl ExerciseTotals {
    pub fn from_entries(entries: &[ExerciseEntry]) -> Self {
        entries.iter().fold(Self::default(), |acc, e| Self {
            total_calories_burned: acc.total_calories_burned + u64::from(e.calories_burned),
            total_duration_minutes: acc.total_duration_minutes + u64::from(e.duration_minutes),
        })
    }
}

/// One day of exercise history
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseDay {
    pub day: NaiveDate,
    pub entries: Vec<ExerciseEntry>,
    pub totals: ExerciseTotals,
}

// ============================================================================
// Water Types
// ============================================================================

/// Global water settings, shared by every day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSettings {
    #[serde(rename = "goal")]
    pub daily_goal_glasses: u32,
    #[serde(rename = "glassSize")]
    pub glass_volume_ml: u32,
}

/// One day's water consumption combined with the global settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WaterState {
    pub glasses_consumed: u32,
    pub daily_goal_glasses: u32,
    pub glass_volume_ml: u32,
}

impl WaterState {
    pub fn goal_reached(&self) -> bool {
        self.glasses_consumed >= self.daily_goal_glasses
    }
}

/// Derived water progress for a day
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaterProgress {
    /// Capped at 100
    pub percentage: f64,
    pub total_ml: u64,
    pub goal_reached: bool,
}

// ============================================================================
// Weight Types
// ============================================================================

/// A body-weight measurement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: EntryId,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

/// Trend numbers over the sorted weight history
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WeightMetrics {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// Positive means above goal
    pub to_goal: f64,
}

/// Treat `""` (what older clients stored for "no notes") as absent
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_notes(raw))
}

pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Allocate an id that is time-derived and strictly greater than any id
/// already in the collection.
pub(crate) fn next_entry_id<I>(existing: I, now: DateTime<Utc>) -> EntryId
where
    I: IntoIterator<Item = EntryId>,
{
    let candidate = now.timestamp_millis();
    match existing.into_iter().max() {
        Some(max) if max >= candidate => max + 1,
        _ => candidate,
    }
}

/// Clamp a user-supplied count to `[1, u32::MAX]`.
pub(crate) fn clamp_positive(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}
