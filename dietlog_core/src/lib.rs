#![forbid(unsafe_code)]

//! Activity ledgers and derived metrics for the dietlog tracker.
//!
//! This crate provides:
//! - Keyed per-day persistence (file-backed and in-memory)
//! - Exercise ledger with preset-driven calorie estimates
//! - Water ledger with global goal and glass-size settings
//! - Weight progress ledger with trend metrics
//! - CSV export, configuration and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod presets;
pub mod exercise;
pub mod water;
pub mod progress;
pub mod meal;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{FileStore, KeyedStore, MemoryStore, StoreKey, TrackerKind};
pub use presets::{find_preset, presets};
pub use exercise::{
    rescale_on_duration_change, select_preset, DraftLink, ExerciseDraft, ExerciseLedger,
    PresetSelection,
};
pub use water::{water_progress, WaterLedger};
pub use progress::{parse_weight, ProgressLedger};
pub use meal::{DailyNutritionSummary, FoodItem, Macros, MealAnalysis};
