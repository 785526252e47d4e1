//! CSV export of stored workouts.
//!
//! Workouts are flattened to one row per set and written atomically: the
//! CSV is built in a temp file next to the target, synced, then renamed over
//! it.

use crate::{Error, Result, Workout};
use std::path::Path;
use tempfile::NamedTempFile;

const HEADERS: [&str; 10] = [
    "workout_id",
    "user_id",
    "date",
    "duration_seconds",
    "entry_index",
    "exercise_ref",
    "set_index",
    "reps",
    "weight",
    "weight_unit",
];

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout_id: &'a str,
    user_id: &'a str,
    date: String,
    duration_seconds: f64,
    entry_index: usize,
    exercise_ref: &'a str,
    set_index: usize,
    reps: u32,
    weight: Option<f64>,
    weight_unit: &'static str,
}

fn rows(workout: &Workout) -> impl Iterator<Item = CsvRow<'_>> {
    let date = workout.date().to_rfc3339();
    workout
        .exercises()
        .iter()
        .enumerate()
        .flat_map(move |(entry_index, entry)| {
            let date = date.clone();
            entry
                .sets()
                .iter()
                .enumerate()
                .map(move |(set_index, set)| CsvRow {
                    workout_id: workout.id().unwrap_or_default(),
                    user_id: workout.user_id(),
                    date: date.clone(),
                    duration_seconds: workout.duration_seconds(),
                    entry_index,
                    exercise_ref: entry.exercise_ref().as_str(),
                    set_index,
                    reps: set.reps(),
                    weight: set.weight(),
                    weight_unit: set.weight_unit().as_str(),
                })
        })
}

/// Write `workouts` to `csv_path`, replacing any existing file.
///
/// Returns the number of set rows written. The header row is always
/// present, even when there are no sets.
pub fn export_csv(workouts: &[Workout], csv_path: &Path) -> Result<usize> {
    let dir = match csv_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    let mut count = 0;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file_mut());
        writer.write_record(HEADERS)?;
        for workout in workouts {
            for row in rows(workout) {
                writer.serialize(row)?;
                count += 1;
            }
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} sets to {:?}", count, csv_path);
    Ok(count)
}
