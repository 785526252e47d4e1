//! Append-only workout store.
//!
//! Workouts are appended to a JSONL (JSON Lines) file with file locking
//! so several processes can log sessions at once.

use crate::types::{Workout, WorkoutDocument};
use crate::workout::validate_workout;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Destination for validated workouts
pub trait WorkoutSink {
    /// Persist a workout, returning the stored record (with its id)
    fn append(&mut self, workout: Workout) -> Result<Workout>;
}

/// JSONL-based workout store with file locking
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Create a new store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl WorkoutSink for JsonlStore {
    fn append(&mut self, workout: Workout) -> Result<Workout> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Caller-supplied ids must stay unique; checked under the lock
        let workout = match workout.id() {
            Some(id) => {
                if contains_id(&file, id)? {
                    file.unlock()?;
                    return Err(Error::Store(format!(
                        "workout '{}' already exists in {:?}",
                        id, self.path
                    )));
                }
                workout
            }
            None => workout.with_id(Uuid::new_v4().to_string()),
        };

        // A torn final line from an interrupted write must not swallow this record
        let needs_newline = ends_mid_line(&mut file)?;
        if needs_newline {
            tracing::warn!("Store {:?} ends with a partial line", self.path);
        }

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&workout)?;
        if needs_newline {
            writer.write_all(b"\n")?;
        }
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Appended workout {} to {:?}",
            workout.id().unwrap_or_default(),
            self.path
        );
        Ok(workout)
    }
}

fn contains_id(mut file: &File, id: &str) -> Result<bool> {
    file.seek(SeekFrom::Start(0))?;
    for line in BufReader::new(file).split(b'\n') {
        let line = line?;
        if let Ok(document) = serde_json::from_slice::<WorkoutDocument>(&line) {
            if document.id.as_deref() == Some(id) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn ends_mid_line(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read every workout from a store file, in append order.
///
/// Each line is re-validated; lines that fail to decode, parse or validate
/// are logged and skipped.
pub fn read_workouts(path: &Path) -> Result<Vec<Workout>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut workouts = Vec::new();

    // Split on raw bytes so a line with invalid UTF-8 is skipped like any other
    for (line_num, line_result) in reader.split(b'\n').enumerate() {
        let line = line_result?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let document = match serde_json::from_slice::<WorkoutDocument>(&line) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Failed to parse workout at line {}: {}", line_num + 1, e);
                continue;
            }
        };

        match validate_workout(&document) {
            Ok(workout) => workouts.push(workout),
            Err(e) => {
                tracing::warn!("Skipping invalid workout at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workouts from {:?}", workouts.len(), path);
    Ok(workouts)
}
