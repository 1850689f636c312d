//! Water ledger.
//!
//! Consumption is stored per day. The goal and glass size are global
//! settings: changing them affects every day, past and future.

use crate::store::{load_value, save_value, KeyedStore, StoreKey, TrackerKind};
use crate::types::{clamp_positive, WaterProgress, WaterSettings, WaterState};
use crate::Result;
use chrono::NaiveDate;

pub const DEFAULT_GOAL_GLASSES: u32 = 8;
pub const DEFAULT_GLASS_SIZE_ML: u32 = 250;
pub const MIN_GLASS_SIZE_ML: u32 = 50;

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            daily_goal_glasses: DEFAULT_GOAL_GLASSES,
            glass_volume_ml: DEFAULT_GLASS_SIZE_ML,
        }
    }
}

impl WaterSettings {
    /// Raise the goal to at least one glass and the glass size to at least 50 ml
    pub fn clamped(self) -> Self {
        Self {
            daily_goal_glasses: self.daily_goal_glasses.max(1),
            glass_volume_ml: self.glass_volume_ml.max(MIN_GLASS_SIZE_ML),
        }
    }
}

/// Percentage and volume for a water state
pub fn water_progress(state: &WaterState) -> WaterProgress {
    let ratio = f64::from(state.glasses_consumed) / f64::from(state.daily_goal_glasses);
    WaterProgress {
        percentage: (ratio * 100.0).min(100.0),
        total_ml: u64::from(state.glasses_consumed) * u64::from(state.glass_volume_ml),
        goal_reached: state.goal_reached(),
    }
}

/// Daily glass counts plus the shared water settings
pub struct WaterLedger<S> {
    store: S,
    defaults: WaterSettings,
}

impl<S: KeyedStore> WaterLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_defaults(store, WaterSettings::default())
    }

    /// Use `defaults` whenever no settings have been saved yet
    pub fn with_defaults(store: S, defaults: WaterSettings) -> Self {
        Self {
            store,
            defaults: defaults.clamped(),
        }
    }

    fn day_key(day: NaiveDate) -> StoreKey {
        StoreKey::daily(TrackerKind::Water, day)
    }

    fn settings_key() -> StoreKey {
        StoreKey::global(TrackerKind::WaterSettings)
    }

    /// Saved settings, or the defaults; out-of-range stored values are clamped
    pub fn settings(&self) -> Result<WaterSettings> {
        let stored: Option<WaterSettings> = load_value(&self.store, &Self::settings_key())?;
        Ok(stored.map_or(self.defaults, WaterSettings::clamped))
    }

    fn consumed(&self, day: NaiveDate) -> Result<u32> {
        Ok(load_value(&self.store, &Self::day_key(day))?.unwrap_or(0))
    }

    pub fn get(&self, day: NaiveDate) -> Result<WaterState> {
        let settings = self.settings()?;
        Ok(WaterState {
            glasses_consumed: self.consumed(day)?,
            daily_goal_glasses: settings.daily_goal_glasses,
            glass_volume_ml: settings.glass_volume_ml,
        })
    }

    /// Add (or, with a negative `n`, remove) glasses for `day`.
    ///
    /// The count never drops below zero.
    pub fn add_glasses(&self, day: NaiveDate, n: i64) -> Result<WaterState> {
        let current = self.consumed(day)?;
        let updated = (i64::from(current) + n).clamp(0, i64::from(u32::MAX)) as u32;

        if updated != current {
            save_value(&self.store, &Self::day_key(day), &updated)?;
            tracing::debug!("Water on {}: {} -> {} glasses", day, current, updated);
        }

        self.get(day)
    }

    /// Set the daily goal (clamped to at least one glass)
    pub fn set_goal(&self, glasses: i64) -> Result<WaterSettings> {
        let mut settings = self.settings()?;
        settings.daily_goal_glasses = clamp_positive(glasses);
        save_value(&self.store, &Self::settings_key(), &settings)?;
        tracing::debug!("Water goal set to {} glasses", settings.daily_goal_glasses);
        Ok(settings)
    }

    /// Set the glass size (clamped to at least 50 ml)
    pub fn set_glass_volume(&self, ml: i64) -> Result<WaterSettings> {
        let mut settings = self.settings()?;
        settings.glass_volume_ml = clamp_positive(ml).max(MIN_GLASS_SIZE_ML);
        save_value(&self.store, &Self::settings_key(), &settings)?;
        tracing::debug!("Glass size set to {} ml", settings.glass_volume_ml);
        Ok(settings)
    }

    pub fn progress(&self, day: NaiveDate) -> Result<WaterProgress> {
        Ok(water_progress(&self.get(day)?))
    }
}
