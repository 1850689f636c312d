//! Built-in exercise presets.
//!
//! Each preset carries a fixed calories-per-minute rate used to estimate
//! the burn for a logged duration.

use crate::types::ExercisePreset;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Preset table, built once and shared process-wide
static PRESETS: Lazy<Vec<ExercisePreset>> = Lazy::new(|| {
    vec![
        preset("Running", 10),
        preset("Walking", 4),
        preset("Cycling", 8),
        preset("Swimming", 9),
        preset("Weightlifting", 6),
        preset("Yoga", 3),
        preset("Dancing", 5),
        preset("HIIT", 12),
    ]
});

fn preset(name: &'static str, calories_per_minute: u32) -> ExercisePreset {
    ExercisePreset {
        name,
        calories_per_minute,
    }
}

/// All presets in display order
pub fn presets() -> &'static [ExercisePreset] {
    &PRESETS
}

/// Look up a preset by exact name
pub fn find_preset(name: &str) -> Option<&'static ExercisePreset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Check the preset table for problems.
///
/// Returns a list of human-readable errors (empty when valid).
pub fn validate_presets(presets: &[ExercisePreset]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for p in presets {
        if p.name.trim().is_empty() {
            errors.push("Preset has empty name".to_string());
        }
        if !seen.insert(p.name) {
            errors.push(format!("Duplicate preset '{}'", p.name));
        }
        if p.calories_per_minute == 0 {
            errors.push(format!("Preset '{}' has a zero burn rate", p.name));
        }
    }

    errors
}
