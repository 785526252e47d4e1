//! Display summaries for workouts and exercises.
//!
//! Summaries are derived values: they borrow nothing from their source and
//! never fail. Sparse raw documents are summarized with safe defaults
//! (`"No date"`, `0` minutes, `0` sets).

use crate::types::{Exercise, Workout, WorkoutDocument};
use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Placeholder shown when a workout carries no usable date
pub const NO_DATE: &str = "No date";

const FALLBACK_PATTERN: &str = "%Y-%m-%d";

/// The caller's date rendering rule: a strftime pattern plus the UTC offset
/// dates are shown in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateStyle {
    pattern: String,
    offset: FixedOffset,
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            pattern: "%-m/%-d/%Y".into(),
            offset: Utc.fix(),
        }
    }
}

impl DateStyle {
    /// Build a style, rejecting patterns chrono cannot render and offsets
    /// beyond ±24h.
    pub fn new(pattern: &str, utc_offset_minutes: i32) -> Result<Self> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!("invalid date format '{}'", pattern)));
        }
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::Config(format!("invalid UTC offset {} minutes", utc_offset_minutes))
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            offset,
        })
    }

    pub fn format(&self, date: &DateTime<Utc>) -> String {
        let local = date.with_timezone(&self.offset);
        let mut out = String::new();
        if write!(out, "{}", local.format(&self.pattern)).is_err() {
            out.clear();
            let _ = write!(out, "{}", local.format(FALLBACK_PATTERN));
        }
        out
    }
}

/// Two display lines for a workout
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkoutSummary {
    pub title: String,
    pub subtitle: String,
}

/// Anything a workout summary can be computed from
pub trait SummarySource {
    fn summary_date(&self) -> Option<DateTime<Utc>>;
    fn summary_duration(&self) -> Option<f64>;
    fn summary_total_sets(&self) -> usize;
}

impl SummarySource for Workout {
    fn summary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.date())
    }

    fn summary_duration(&self) -> Option<f64> {
        Some(self.duration_seconds())
    }

    fn summary_total_sets(&self) -> usize {
        self.total_sets()
    }
}

impl SummarySource for WorkoutDocument {
    fn summary_date(&self) -> Option<DateTime<Utc>> {
        self.date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    fn summary_duration(&self) -> Option<f64> {
        self.duration
    }

    fn summary_total_sets(&self) -> usize {
        self.exercises
            .iter()
            .flatten()
            .map(|entry| count_sets(entry.sets.as_ref()))
            .sum()
    }
}

/// Number of sets in an untyped `sets` value; anything but an array is 0
pub fn count_sets(sets: Option<&Value>) -> usize {
    match sets {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

/// Whole minutes, rounded half away from zero. Missing, zero or non-finite
/// durations give 0.
pub fn duration_minutes(seconds: Option<f64>) -> i64 {
    match seconds {
        Some(s) if s.is_finite() && s != 0.0 => (s / 60.0).round() as i64,
        _ => 0,
    }
}

pub fn format_date(date: Option<DateTime<Utc>>, style: &DateStyle) -> String {
    match date {
        Some(date) => style.format(&date),
        None => NO_DATE.to_string(),
    }
}

/// `"1 set"` for exactly one, `"N sets"` otherwise (including zero)
pub fn set_count_label(total: usize) -> String {
    if total == 1 {
        "1 set".to_string()
    } else {
        format!("{} sets", total)
    }
}

/// Summarize a workout or raw workout document
pub fn summarize<S: SummarySource + ?Sized>(source: &S, style: &DateStyle) -> WorkoutSummary {
    let date = format_date(source.summary_date(), style);
    let minutes = duration_minutes(source.summary_duration());
    let sets = set_count_label(source.summary_total_sets());

    WorkoutSummary {
        title: format!("Workout on {}", date),
        subtitle: format!("{} min • {}", minutes, sets),
    }
}

/// Listing line for a catalog exercise: its name and stored difficulty value
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExercisePreview {
    pub title: String,
    pub subtitle: Option<String>,
}

pub fn preview_exercise(exercise: &Exercise) -> ExercisePreview {
    ExercisePreview {
        title: exercise.name().to_string(),
        subtitle: exercise.difficulty().map(|d| d.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::validate_workout;
    use serde_json::json;

    fn workout_doc(value: Value) -> WorkoutDocument {
        serde_json::from_value(value).unwrap()
    }

    fn workout_with_sets(set_counts: &[usize], duration: f64) -> Workout {
        let exercises: Vec<Value> = set_counts
            .iter()
            .enumerate()
            .map(|(i, n)| {
                json!({
                    "exerciseRef": format!("ex_{}", i),
                    "sets": vec![json!({"reps": 5}); *n],
                })
            })
            .collect();
        validate_workout(&workout_doc(json!({
            "userId": "u1",
            "date": "2024-01-15T10:30:00Z",
            "duration": duration,
            "exercises": exercises,
        })))
        .unwrap()
    }

    #[test]
    fn test_duration_rounds_to_nearest_minute() {
        assert_eq!(duration_minutes(Some(125.0)), 2);
        assert_eq!(duration_minutes(Some(150.0)), 3);
        assert_eq!(duration_minutes(Some(149.0)), 2);
        assert_eq!(duration_minutes(Some(29.0)), 0);
        assert_eq!(duration_minutes(Some(0.0)), 0);
        assert_eq!(duration_minutes(None), 0);
        assert_eq!(duration_minutes(Some(f64::NAN)), 0);
    }

    #[test]
    fn test_set_count_label_pluralization() {
        assert_eq!(set_count_label(0), "0 sets");
        assert_eq!(set_count_label(1), "1 set");
        assert_eq!(set_count_label(5), "5 sets");
    }

    #[test]
    fn test_summary_of_validated_workout() {
        let workout = workout_with_sets(&[3, 2], 125.0);
        let summary = summarize(&workout, &DateStyle::default());

        assert_eq!(summary.title, "Workout on 1/15/2024");
        assert_eq!(summary.subtitle, "2 min • 5 sets");
    }

    #[test]
    fn test_single_set_is_singular() {
        let workout = workout_with_sets(&[1], 60.0);
        let summary = summarize(&workout, &DateStyle::default());
        assert_eq!(summary.subtitle, "1 min • 1 set");
    }

    #[test]
    fn test_empty_workout_summary() {
        let workout = workout_with_sets(&[], 0.0);
        let summary = summarize(&workout, &DateStyle::default());
        assert_eq!(summary.subtitle, "0 min • 0 sets");
    }

    #[test]
    fn test_sparse_document_never_fails() {
        let summary = summarize(&WorkoutDocument::default(), &DateStyle::default());
        assert_eq!(summary.title, "Workout on No date");
        assert_eq!(summary.subtitle, "0 min • 0 sets");

        let doc = workout_doc(json!({
            "date": "not a date",
            "duration": 600,
            "exercises": [
                {"sets": [{}, {}]},
                {"sets": "garbage"},
                {},
                {"sets": [{"reps": 3}]}
            ]
        }));
        let summary = summarize(&doc, &DateStyle::default());
        assert_eq!(summary.title, "Workout on No date");
        assert_eq!(summary.subtitle, "10 min • 3 sets");
    }

    #[test]
    fn test_date_style_applies_offset_and_pattern() {
        let style = DateStyle::new("%Y-%m-%d", -5 * 60).unwrap();
        let doc = workout_doc(json!({"date": "2024-01-15T03:00:00Z"}));

        // 03:00 UTC is still the previous evening at UTC-5
        assert_eq!(summarize(&doc, &style).title, "Workout on 2024-01-14");
    }

    #[test]
    fn test_date_style_rejects_bad_input() {
        assert!(DateStyle::new("%Q", 0).is_err());
        assert!(DateStyle::new("%d.%m.%Y", 25 * 60).is_err());
        assert!(DateStyle::new("%d.%m.%Y", 9 * 60).is_ok());
    }

    #[test]
    fn test_summary_is_idempotent() {
        let workout = workout_with_sets(&[2, 2, 1], 3600.0);
        let style = DateStyle::default();
        assert_eq!(summarize(&workout, &style), summarize(&workout, &style));
        assert_eq!(summarize(&workout, &style), summarize(&workout.to_document(), &style));
    }

    #[test]
    fn test_exercise_preview() {
        let catalog = crate::catalog::build_default_catalog();
        let bench = &catalog.exercises["bench_press"];

        let preview = preview_exercise(bench);
        assert_eq!(preview.title, "Barbell Bench Press");
        assert_eq!(preview.subtitle.as_deref(), Some("intermediate"));

        let push_up = preview_exercise(&catalog.exercises["push_up"]);
        assert_eq!(push_up.subtitle.as_deref(), Some("beginner"));
    }
}
