use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dietlog_core::export::{write_exercise_csv, write_weight_csv};
use dietlog_core::presets::validate_presets;
use dietlog_core::progress::entry_delta;
use dietlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dietlog")]
#[command(about = "Diet and fitness activity tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Day to operate on (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Overview of exercise, water and weight for the day (default)
    Today {
        /// Daily nutrition summary JSON from the meal service
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Daily calorie target (defaults to the configured target)
        #[arg(long)]
        target: Option<u32>,
    },

    /// Log and review exercise
    Exercise {
        #[command(subcommand)]
        action: ExerciseAction,
    },

    /// Track glasses of water
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Track body weight against a goal
    Weight {
        #[command(subcommand)]
        action: WeightAction,
    },

    /// Export history to CSV
    Export {
        #[command(subcommand)]
        action: ExportAction,
    },
}

#[derive(Subcommand)]
enum ExerciseAction {
    /// List the day's exercises
    List,
    /// Log a custom exercise
    Add {
        name: String,
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        duration: i64,
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        calories: i64,
    },
    /// Log a preset exercise; calories follow the preset rate
    Preset {
        name: String,
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        duration: i64,
    },
    /// Delete an exercise by id
    Remove { id: EntryId },
    /// Show the preset table
    Presets,
    /// Per-day totals over a date range
    History {
        #[arg(long)]
        from: NaiveDate,
        /// Defaults to the selected day
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum WaterAction {
    /// Show the day's water progress
    Show,
    /// Add glasses (negative to remove)
    Add {
        #[arg(allow_negative_numbers = true)]
        glasses: i64,
    },
    /// Set the daily goal in glasses
    Goal {
        #[arg(allow_negative_numbers = true)]
        glasses: i64,
    },
    /// Set the glass size in ml
    GlassSize {
        #[arg(allow_negative_numbers = true)]
        ml: i64,
    },
}

#[derive(Subcommand)]
enum WeightAction {
    /// List weight entries, newest first
    List,
    /// Record a weight in kg
    Add {
        #[arg(allow_negative_numbers = true)]
        weight: String,
        /// Measurement date (defaults to the selected day)
        #[arg(long)]
        on: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a weight entry by id
    Remove { id: EntryId },
    /// Show or set the goal weight
    Goal {
        #[arg(allow_negative_numbers = true)]
        weight: Option<String>,
    },
    /// Current weight, change and distance to goal
    Metrics,
}

#[derive(Subcommand)]
enum ExportAction {
    /// Export all weight entries
    Weights {
        #[arg(long)]
        out: PathBuf,
    },
    /// Export exercises in a date range
    Exercises {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    dietlog_core::logging::init_with_level(dietlog_core::logging::level_for_verbosity(cli.verbose));

    for error in validate_presets(presets()) {
        tracing::warn!("Preset table: {}", error);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let day = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let store = FileStore::new(data_dir);

    match cli.command {
        Some(Commands::Exercise { action }) => cmd_exercise(&store, day, action),
        Some(Commands::Water { action }) => cmd_water(&store, day, action, &config),
        Some(Commands::Weight { action }) => cmd_weight(&store, day, action, &config),
        Some(Commands::Export { action }) => cmd_export(&store, action),
        Some(Commands::Today { summary, target }) => {
            cmd_today(&store, day, summary.as_deref(), target, &config)
        }
        None => cmd_today(&store, day, None, None, &config),
    }
}

/// Read-path fallback: a storage failure degrades to a default value.
fn read_or<T>(result: Result<T>, what: &str, fallback: impl FnOnce() -> T) -> Result<T> {
    match result {
        Err(e) if e.is_storage_failure() => {
            tracing::warn!("Could not read {}: {}. Showing defaults.", what, e);
            eprintln!("warning: could not read {} ({}); showing defaults", what, e);
            Ok(fallback())
        }
        other => other,
    }
}

fn cmd_exercise(store: &FileStore, day: NaiveDate, action: ExerciseAction) -> Result<()> {
    let ledger = ExerciseLedger::new(store);

    match action {
        ExerciseAction::List => {
            let entries = read_or(ledger.list(day), "exercises", Vec::new)?;
            print_exercises(day, &entries);
        }
        ExerciseAction::Add {
            name,
            duration,
            calories,
        } => {
            let draft = ExerciseDraft::new(name, duration, calories);
            log_draft(&ledger, day, &draft)?;
        }
        ExerciseAction::Preset { name, duration } => {
            let mut draft = ExerciseDraft::default();
            draft.set_duration(duration);
            if !draft.select_preset(&name) {
                println!("Unknown preset '{}'. Run `dietlog exercise presets` for the list.", name);
                return Ok(());
            }
            log_draft(&ledger, day, &draft)?;
        }
        ExerciseAction::Remove { id } => {
            if ledger.remove(day, id)? {
                println!("✓ Removed exercise {}", id);
            } else {
                println!("No exercise {} on {}", id, day);
            }
        }
        ExerciseAction::Presets => {
            for preset in presets() {
                println!("  {:<14} {:>3} cal/min", preset.name, preset.calories_per_minute);
            }
        }
        ExerciseAction::History { from, to } => {
            let to = to.unwrap_or(day);
            let days = read_or(ledger.history(from, to), "exercise history", Vec::new)?;
            if days.is_empty() {
                println!("No exercises between {} and {}", from, to);
            }
            for logged in &days {
                println!(
                    "  {}  {:>4} min  {:>5} cal  ({} entries)",
                    logged.day,
                    logged.totals.total_duration_minutes,
                    logged.totals.total_calories_burned,
                    logged.entries.len()
                );
            }
        }
    }

    Ok(())
}

fn log_draft<S: KeyedStore>(
    ledger: &ExerciseLedger<S>,
    day: NaiveDate,
    draft: &ExerciseDraft,
) -> Result<()> {
    match ledger.add_draft(day, draft)? {
        Some(entry) => println!(
            "✓ Logged {} ({} min, {} cal) [id {}]",
            entry.name, entry.duration_minutes, entry.calories_burned, entry.id
        ),
        None => println!("Nothing logged: exercise name is empty"),
    }
    Ok(())
}

fn print_exercises(day: NaiveDate, entries: &[ExerciseEntry]) {
    if entries.is_empty() {
        println!("No exercises logged on {}", day);
        return;
    }

    for entry in entries {
        println!(
            "  [{}] {} • {} min • {} cal",
            entry.id, entry.name, entry.duration_minutes, entry.calories_burned
        );
    }
    let totals = ExerciseTotals::from_entries(entries);
    println!(
        "Total: {} cal burned, {} min active",
        totals.total_calories_burned, totals.total_duration_minutes
    );
}

fn cmd_water(store: &FileStore, day: NaiveDate, action: WaterAction, config: &Config) -> Result<()> {
    let ledger = WaterLedger::with_defaults(store, config.water.settings());

    let state = match action {
        WaterAction::Show => read_or(ledger.get(day), "water", || default_water(config))?,
        WaterAction::Add { glasses } => ledger.add_glasses(day, glasses)?,
        WaterAction::Goal { glasses } => {
            let settings = ledger.set_goal(glasses)?;
            println!("✓ Daily goal: {} glasses", settings.daily_goal_glasses);
            ledger.get(day)?
        }
        WaterAction::GlassSize { ml } => {
            let settings = ledger.set_glass_volume(ml)?;
            println!("✓ Glass size: {}ml", settings.glass_volume_ml);
            ledger.get(day)?
        }
    };

    print_water(&state);
    Ok(())
}

fn default_water(config: &Config) -> WaterState {
    let settings = config.water.settings();
    WaterState {
        glasses_consumed: 0,
        daily_goal_glasses: settings.daily_goal_glasses,
        glass_volume_ml: settings.glass_volume_ml,
    }
}

fn print_water(state: &WaterState) {
    let progress = water_progress(state);
    println!(
        "Water: {}/{} glasses ({}ml, {:.0}%)",
        state.glasses_consumed, state.daily_goal_glasses, progress.total_ml, progress.percentage
    );
    if progress.goal_reached {
        println!("🎉 Daily water goal reached!");
    }
}

fn cmd_weight(store: &FileStore, day: NaiveDate, action: WeightAction, config: &Config) -> Result<()> {
    let ledger = ProgressLedger::with_default_goal(store, config.progress.default_goal_kg);

    match action {
        WeightAction::List => {
            let entries = read_or(ledger.list(), "weight entries", Vec::new)?;
            if entries.is_empty() {
                println!("No weight entries yet");
            }
            for (index, entry) in entries.iter().enumerate() {
                let delta = entry_delta(&entries, index);
                let change = if delta != 0.0 {
                    format!("{:+.1} kg", delta)
                } else {
                    String::new()
                };
                println!(
                    "  [{}] {}  {:.1} kg  {}  {}",
                    entry.id,
                    entry.date,
                    entry.weight_kg,
                    change,
                    entry.notes.as_deref().unwrap_or("")
                );
            }
        }
        WeightAction::Add { weight, on, notes } => {
            let Some(kg) = parse_weight(&weight) else {
                println!("Nothing logged: '{}' is not a weight", weight);
                return Ok(());
            };
            match ledger.add(kg, on.unwrap_or(day), notes)? {
                Some(entry) => println!(
                    "✓ Logged {:.1} kg for {} [id {}]",
                    entry.weight_kg, entry.date, entry.id
                ),
                None => println!("Nothing logged: '{}' is not a weight", weight),
            }
        }
        WeightAction::Remove { id } => {
            if ledger.remove(id)? {
                println!("✓ Removed weight entry {}", id);
            } else {
                println!("No weight entry {}", id);
            }
        }
        WeightAction::Goal { weight: None } => {
            let goal = read_or(ledger.goal(), "goal weight", || config.progress.default_goal_kg)?;
            println!("Goal weight: {:.1} kg", goal);
        }
        WeightAction::Goal {
            weight: Some(weight),
        } => {
            let goal = match parse_weight(&weight) {
                Some(kg) => ledger.set_goal(kg)?,
                None => ledger.goal()?,
            };
            println!("Goal weight: {:.1} kg", goal);
        }
        WeightAction::Metrics => {
            let metrics = read_or(ledger.metrics(), "weight metrics", WeightMetrics::default)?;
            print_weight_metrics(&metrics);
        }
    }

    Ok(())
}

fn print_weight_metrics(metrics: &WeightMetrics) {
    if metrics.current == 0.0 {
        println!("Current weight: -- kg");
    } else {
        println!("Current weight: {:.1} kg", metrics.current);
    }
    println!("Change: {:+.1} kg", metrics.change);
    if metrics.to_goal > 0.0 {
        println!("To goal: {:.1} kg above", metrics.to_goal);
    } else {
        println!("To goal: {:.1} kg below", metrics.to_goal.abs());
    }
}

fn cmd_export(store: &FileStore, action: ExportAction) -> Result<()> {
    match action {
        ExportAction::Weights { out } => {
            let entries = ProgressLedger::new(store).list()?;
            let count = write_weight_csv(&entries, &out)?;
            println!("✓ Exported {} weight entries to {}", count, out.display());
        }
        ExportAction::Exercises { from, to, out } => {
            let days = ExerciseLedger::new(store).history(from, to)?;
            let count = write_exercise_csv(&days, &out)?;
            println!("✓ Exported {} exercises to {}", count, out.display());
        }
    }
    Ok(())
}

/// Calorie ring numbers: the meal service's consumed total against a target
struct CalorieBudget {
    consumed: f64,
    target: f64,
}

impl CalorieBudget {
    fn remaining(&self) -> f64 {
        self.target - self.consumed
    }

    fn percentage(&self) -> f64 {
        (self.consumed / self.target * 100.0).min(100.0)
    }
}

fn load_summary(path: &Path) -> Result<DailyNutritionSummary> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn cmd_today(
    store: &FileStore,
    day: NaiveDate,
    summary: Option<&Path>,
    target: Option<u32>,
    config: &Config,
) -> Result<()> {
    println!("── {} ──", day);

    if let Some(path) = summary {
        let summary = load_summary(path)?;
        let budget = CalorieBudget {
            consumed: summary.total_calories,
            target: f64::from(target.unwrap_or(config.nutrition.daily_calorie_target).max(1)),
        };
        println!(
            "Calories: {:.0} of {:.0} ({:.0}%)",
            budget.consumed,
            budget.target,
            budget.percentage()
        );
        let remaining = budget.remaining();
        if remaining > 0.0 {
            println!("  {:.0} calories remaining today", remaining);
        } else {
            println!("  {:.0} calories over target", remaining.abs());
        }
        println!(
            "  Protein {:.0}g • Carbs {:.0}g • Fat {:.0}g",
            summary.total_macros.protein_g, summary.total_macros.carbs_g, summary.total_macros.fat_g
        );
    }

    let totals = read_or(
        ExerciseLedger::new(store).totals(day),
        "exercises",
        ExerciseTotals::default,
    )?;
    println!(
        "Exercise: {} cal burned, {} min active",
        totals.total_calories_burned, totals.total_duration_minutes
    );

    let water = WaterLedger::with_defaults(store, config.water.settings());
    let state = read_or(water.get(day), "water", || default_water(config))?;
    print_water(&state);

    let progress = ProgressLedger::with_default_goal(store, config.progress.default_goal_kg);
    let metrics = read_or(progress.metrics(), "weight metrics", WeightMetrics::default)?;
    print_weight_metrics(&metrics);

    Ok(())
}
