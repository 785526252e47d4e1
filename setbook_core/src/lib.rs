#![forbid(unsafe_code)]

//! Core domain model and business logic for setbook.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, entries, sets) and their raw documents
//! - Validation of raw documents into explicit records
//! - Workout summaries for display
//! - Exercise catalog and weak-reference resolution
//! - Persistence (JSONL store, CSV export) and per-user history

pub mod types;
pub mod error;
pub mod exercise;
pub mod workout;
pub mod summary;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod history;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError, ValidationReason};
pub use types::*;
pub use exercise::validate_exercise;
pub use workout::validate_workout;
pub use summary::{preview_exercise, summarize, DateStyle, ExercisePreview, WorkoutSummary};
pub use catalog::{build_default_catalog, dangling_refs, get_default_catalog, resolve, ExerciseLookup, Resolution};
pub use config::Config;
pub use store::{read_workouts, JsonlStore, WorkoutSink};
pub use history::{find_workout, load_user_workouts};
pub use csv_export::export_csv;
