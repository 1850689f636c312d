//! CSV export of ledger history.
//!
//! Files are written to a temp file in the target directory, synced, then
//! renamed into place so a reader never sees a half-written export.

use crate::progress::entry_delta;
use crate::types::{ExerciseDay, WeightEntry};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
struct WeightRow<'a> {
    id: i64,
    date: String,
    weight_kg: f64,
    change_kg: f64,
    notes: &'a str,
}

#[derive(Debug, Serialize)]
struct ExerciseRow<'a> {
    date: String,
    id: i64,
    name: &'a str,
    duration_minutes: u32,
    calories_burned: u32,
    logged_at: String,
}

/// Write weight entries (expected newest first) with per-row change.
///
/// Returns the number of rows written.
pub fn write_weight_csv(entries: &[WeightEntry], path: &Path) -> Result<usize> {
    let rows = entries.iter().enumerate().map(|(index, entry)| WeightRow {
        id: entry.id,
        date: entry.date.to_string(),
        weight_kg: entry.weight_kg,
        change_kg: entry_delta(entries, index),
        notes: entry.notes.as_deref().unwrap_or(""),
    });
    let count = write_rows(rows, path)?;
    tracing::info!("Exported {} weight entries to {:?}", count, path);
    Ok(count)
}

/// Write every entry of every day, in day then insertion order.
pub fn write_exercise_csv(days: &[ExerciseDay], path: &Path) -> Result<usize> {
    let rows = days.iter().flat_map(|day| {
        day.entries.iter().map(move |entry| ExerciseRow {
            date: day.day.to_string(),
            id: entry.id,
            name: &entry.name,
            duration_minutes: entry.duration_minutes,
            calories_burned: entry.calories_burned,
            logged_at: entry.created_at.to_rfc3339(),
        })
    });
    let count = write_rows(rows, path)?;
    tracing::info!("Exported {} exercise entries to {:?}", count, path);
    Ok(count)
}

fn write_rows<T, I>(rows: I, path: &Path) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = csv::Writer::from_writer(temp.as_file());

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    drop(writer);

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(count)
}
