//! Body-weight progress ledger.
//!
//! Entries form one global collection that is always presented newest
//! date first. Same-day entries keep their insertion order.

use crate::store::{load_records, load_value, save_value, KeyedStore, StoreKey, TrackerKind};
use crate::types::{next_entry_id, normalize_notes, EntryId, WeightEntry, WeightMetrics};
use crate::Result;
use chrono::{NaiveDate, Utc};

pub const DEFAULT_GOAL_KG: f64 = 70.0;

/// Stable sort, newest date first
pub fn sort_newest_first(entries: &mut [WeightEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Trend metrics over entries already sorted newest first
pub fn compute_metrics(sorted: &[WeightEntry], goal_kg: f64) -> WeightMetrics {
    let current = sorted.first().map_or(0.0, |e| e.weight_kg);
    let previous = sorted.get(1).map_or(current, |e| e.weight_kg);
    WeightMetrics {
        current,
        previous,
        change: current - previous,
        to_goal: current - goal_kg,
    }
}

/// Change of `sorted[index]` against the next-older entry, 0 if none
pub fn entry_delta(sorted: &[WeightEntry], index: usize) -> f64 {
    match (sorted.get(index), index.checked_add(1).and_then(|i| sorted.get(i))) {
        (Some(entry), Some(older)) => entry.weight_kg - older.weight_kg,
        _ => 0.0,
    }
}

/// Parse user text as a weight; `None` for blank or non-numeric input
pub fn parse_weight(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Weight entries and the goal weight backed by a keyed store
pub struct ProgressLedger<S> {
    store: S,
    default_goal_kg: f64,
}

impl<S: KeyedStore> ProgressLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_default_goal(store, DEFAULT_GOAL_KG)
    }

    /// Use `default_goal_kg` until a goal is saved
    pub fn with_default_goal(store: S, default_goal_kg: f64) -> Self {
        Self {
            store,
            default_goal_kg,
        }
    }

    fn entries_key() -> StoreKey {
        StoreKey::global(TrackerKind::Weight)
    }

    fn goal_key() -> StoreKey {
        StoreKey::global(TrackerKind::WeightGoal)
    }

    /// All entries, newest date first
    pub fn list(&self) -> Result<Vec<WeightEntry>> {
        let mut entries: Vec<WeightEntry> = load_records(&self.store, &Self::entries_key())?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Record a weight.
    ///
    /// Non-finite or non-positive weights are rejected and `None` is
    /// returned without touching stored state.
    pub fn add(
        &self,
        weight_kg: f64,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Option<WeightEntry>> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            tracing::warn!("Rejected weight entry {}", weight_kg);
            return Ok(None);
        }

        let mut entries = self.list()?;
        let entry = WeightEntry {
            id: next_entry_id(entries.iter().map(|e| e.id), Utc::now()),
            weight_kg,
            date,
            notes: normalize_notes(notes),
        };

        entries.push(entry.clone());
        sort_newest_first(&mut entries);
        save_value(&self.store, &Self::entries_key(), &entries)?;

        tracing::debug!("Logged weight {} kg for {} (id {})", weight_kg, date, entry.id);
        Ok(Some(entry))
    }

    /// Delete an entry; returns false when `id` is not present.
    pub fn remove(&self, id: EntryId) -> Result<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            return Ok(false);
        }

        save_value(&self.store, &Self::entries_key(), &entries)?;
        tracing::debug!("Removed weight entry {}", id);
        Ok(true)
    }

    pub fn goal(&self) -> Result<f64> {
        Ok(load_value(&self.store, &Self::goal_key())?.unwrap_or(self.default_goal_kg))
    }

    /// Save the goal weight. Non-finite or non-positive values are
    /// ignored; the returned value is the goal in effect afterwards.
    pub fn set_goal(&self, weight_kg: f64) -> Result<f64> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            tracing::warn!("Rejected goal weight {}", weight_kg);
            return self.goal();
        }

        save_value(&self.store, &Self::goal_key(), &weight_kg)?;
        tracing::debug!("Goal weight set to {} kg", weight_kg);
        Ok(weight_kg)
    }

    pub fn metrics(&self) -> Result<WeightMetrics> {
        Ok(compute_metrics(&self.list()?, self.goal()?))
    }

    pub fn entry_delta(&self, index: usize) -> Result<f64> {
        Ok(entry_delta(&self.list()?, index))
    }
}
