//! Exercise ledger and draft editing.
//!
//! A draft is the not-yet-logged entry being edited. Its calorie estimate
//! follows one of two rules when the duration changes:
//! - Preset-linked drafts re-derive calories from the preset rate
//! - Freeform drafts scale by the ratio implied by their current values

use crate::presets::find_preset;
use crate::store::{load_records, save_value, KeyedStore, StoreKey, TrackerKind};
use crate::types::{
    clamp_positive, next_entry_id, EntryId, ExerciseDay, ExerciseEntry, ExerciseTotals,
};
use crate::Result;
use chrono::{NaiveDate, Utc};

const DEFAULT_DRAFT_DURATION: u32 = 30;
const DEFAULT_DRAFT_CALORIES: u32 = 100;

/// How a draft's calories respond to a duration change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftLink {
    PresetLinked { calories_per_minute: u32 },
    Freeform,
}

impl DraftLink {
    fn for_name(name: &str) -> Self {
        match find_preset(name) {
            Some(p) => DraftLink::PresetLinked {
                calories_per_minute: p.calories_per_minute,
            },
            None => DraftLink::Freeform,
        }
    }
}

/// Values a preset selection produces for the next draft
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetSelection {
    pub name: String,
    pub calories_burned: u32,
}

/// Look up `preset_name` and estimate calories for `current_duration`.
///
/// Returns `None` for an unknown preset. Does not touch persisted state.
pub fn select_preset(preset_name: &str, current_duration: i64) -> Option<PresetSelection> {
    let preset = find_preset(preset_name)?;
    Some(PresetSelection {
        name: preset.name.to_string(),
        calories_burned: rate_times(preset.calories_per_minute, clamp_positive(current_duration)),
    })
}

/// Calories for `draft` after its duration becomes `new_duration`.
pub fn rescale_on_duration_change(draft: &ExerciseDraft, new_duration: i64) -> u32 {
    let new_duration = clamp_positive(new_duration);
    match draft.link {
        DraftLink::PresetLinked {
            calories_per_minute,
        } => rate_times(calories_per_minute, new_duration),
        DraftLink::Freeform => {
            let rate = f64::from(draft.calories_burned) / f64::from(draft.duration_minutes);
            let scaled = (rate * f64::from(new_duration)).round();
            clamp_positive(scaled as i64)
        }
    }
}

fn rate_times(calories_per_minute: u32, duration: u32) -> u32 {
    clamp_positive((u64::from(calories_per_minute) * u64::from(duration)) as i64)
}

/// An exercise entry being edited before it is logged
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseDraft {
    name: String,
    duration_minutes: u32,
    calories_burned: u32,
    link: DraftLink,
}

impl Default for ExerciseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration_minutes: DEFAULT_DRAFT_DURATION,
            calories_burned: DEFAULT_DRAFT_CALORIES,
            link: DraftLink::Freeform,
        }
    }
}

impl ExerciseDraft {
    /// Build a draft from raw values; a name matching a preset links it.
    pub fn new(name: impl Into<String>, duration_minutes: i64, calories_burned: i64) -> Self {
        let name = name.into();
        Self {
            link: DraftLink::for_name(&name),
            name,
            duration_minutes: clamp_positive(duration_minutes),
            calories_burned: clamp_positive(calories_burned),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn calories_burned(&self) -> u32 {
        self.calories_burned
    }

    pub fn link(&self) -> DraftLink {
        self.link
    }

    /// Apply a preset at the draft's current duration.
    ///
    /// Returns false (and leaves the draft alone) for an unknown preset.
    pub fn select_preset(&mut self, preset_name: &str) -> bool {
        let Some(selection) = select_preset(preset_name, i64::from(self.duration_minutes)) else {
            tracing::warn!("Unknown exercise preset '{}'", preset_name);
            return false;
        };
        self.link = DraftLink::for_name(&selection.name);
        self.name = selection.name;
        self.calories_burned = selection.calories_burned;
        true
    }

    /// Edit the name; typing a preset's exact name links the draft to it.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.link = DraftLink::for_name(&self.name);
    }

    pub fn set_calories(&mut self, calories_burned: i64) {
        self.calories_burned = clamp_positive(calories_burned);
    }

    /// Change the duration and rescale calories accordingly.
    pub fn set_duration(&mut self, duration_minutes: i64) {
        self.calories_burned = rescale_on_duration_change(self, duration_minutes);
        self.duration_minutes = clamp_positive(duration_minutes);
    }
}

/// Day-scoped exercise entries backed by a keyed store
pub struct ExerciseLedger<S> {
    store: S,
}

impl<S: KeyedStore> ExerciseLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(day: NaiveDate) -> StoreKey {
        StoreKey::daily(TrackerKind::Exercise, day)
    }

    /// Entries for `day` in insertion order
    pub fn list(&self, day: NaiveDate) -> Result<Vec<ExerciseEntry>> {
        load_records(&self.store, &Self::key(day))
    }

    /// Log an exercise.
    ///
    /// Duration and calories are clamped to at least 1. A blank name is
    /// rejected: nothing is stored and `None` is returned.
    pub fn add(
        &self,
        day: NaiveDate,
        name: &str,
        duration_minutes: i64,
        calories_burned: i64,
    ) -> Result<Option<ExerciseEntry>> {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("Rejected exercise with empty name");
            return Ok(None);
        }

        let mut entries = self.list(day)?;
        let now = Utc::now();
        let entry = ExerciseEntry {
            id: next_entry_id(entries.iter().map(|e| e.id), now),
            name: name.to_string(),
            duration_minutes: clamp_positive(duration_minutes),
            calories_burned: clamp_positive(calories_burned),
            created_at: now,
        };

        entries.push(entry.clone());
        save_value(&self.store, &Self::key(day), &entries)?;

        tracing::debug!(
            "Logged exercise {} '{}' on {} ({} min, {} cal)",
            entry.id,
            entry.name,
            day,
            entry.duration_minutes,
            entry.calories_burned
        );
        Ok(Some(entry))
    }

    /// Log the current state of a draft
    pub fn add_draft(&self, day: NaiveDate, draft: &ExerciseDraft) -> Result<Option<ExerciseEntry>> {
        self.add(
            day,
            draft.name(),
            i64::from(draft.duration_minutes()),
            i64::from(draft.calories_burned()),
        )
    }

    /// Delete an entry; returns false when `id` is not present.
    pub fn remove(&self, day: NaiveDate, id: EntryId) -> Result<bool> {
        let mut entries = self.list(day)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            tracing::debug!("No exercise {} on {}", id, day);
            return Ok(false);
        }

        save_value(&self.store, &Self::key(day), &entries)?;
        tracing::debug!("Removed exercise {} from {}", id, day);
        Ok(true)
    }

    pub fn totals(&self, day: NaiveDate) -> Result<ExerciseTotals> {
        Ok(ExerciseTotals::from_entries(&self.list(day)?))
    }

    /// Logged days in `from..=to`, oldest first. Days without a stored
    /// record are skipped.
    pub fn history(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<ExerciseDay>> {
        let mut days = Vec::new();
        for day in self.store.days_with_records(TrackerKind::Exercise)? {
            if day < from || day > to {
                continue;
            }
            let entries = self.list(day)?;
            days.push(ExerciseDay {
                day,
                totals: ExerciseTotals::from_entries(&entries),
                entries,
            });
        }

        tracing::debug!("Loaded {} exercise days between {} and {}", days.len(), from, to);
        Ok(days)
    }
}
