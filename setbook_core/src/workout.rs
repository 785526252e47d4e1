//! Workout session entity: validation, accessors and set labels.
//!
//! Validation walks the document in field order (`userId`, `date`,
//! `duration`, then each entry and its sets) and returns the first violation.
//! It never looks up `exerciseRef` in a catalog; see [`crate::catalog`] for
//! reference resolution.

use crate::error::ValidationError;
use crate::types::{
    ExerciseEntry, ExerciseEntryDocument, ExerciseRef, ExerciseSet, ExerciseSetDocument,
    ReferenceDocument, WeightUnit, Workout, WorkoutDocument,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Validate a raw workout document into an explicit, immutable record.
pub fn validate_workout(doc: &WorkoutDocument) -> Result<Workout, ValidationError> {
    let user_id = match doc.user_id.as_deref() {
        Some(user_id) if !user_id.is_empty() => user_id.to_string(),
        _ => return Err(ValidationError::missing("userId")),
    };

    let date = match doc.date.as_deref() {
        Some(date) if !date.is_empty() => parse_date(date)?,
        _ => return Err(ValidationError::missing("date")),
    };

    let duration = match doc.duration {
        None => return Err(ValidationError::missing("duration")),
        Some(d) => non_negative(d, "duration")?,
    };

    let entries = doc
        .exercises
        .as_ref()
        .ok_or_else(|| ValidationError::missing("exercises"))?;

    let exercises = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| validate_entry(entry, &format!("exercises[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Workout {
        id: doc.id.clone(),
        user_id,
        date,
        duration,
        exercises,
    })
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::wrong_type("date", "an RFC 3339 timestamp"))
}

fn non_negative(value: f64, path: &str) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::wrong_type(path, "a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::out_of_range(path, "must be >= 0"));
    }
    Ok(value)
}

fn validate_entry(doc: &ExerciseEntryDocument, path: &str) -> Result<ExerciseEntry, ValidationError> {
    let exercise_ref = match doc.exercise_ref.as_ref().map(ReferenceDocument::target) {
        Some(target) if !target.is_empty() => ExerciseRef(target.to_string()),
        _ => return Err(ValidationError::missing(format!("{}.exerciseRef", path))),
    };

    let sets = match &doc.sets {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(j, item)| validate_set_value(item, &format!("{}.sets[{}]", path, j)))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ValidationError::wrong_type(format!("{}.sets", path), "an array")),
    };

    Ok(ExerciseEntry { exercise_ref, sets })
}

fn validate_set_value(item: &Value, path: &str) -> Result<ExerciseSet, ValidationError> {
    let doc = ExerciseSetDocument::deserialize_from(item)
        .ok_or_else(|| ValidationError::wrong_type(path, "a set object"))?;
    validate_set(&doc, path)
}

fn validate_set(doc: &ExerciseSetDocument, path: &str) -> Result<ExerciseSet, ValidationError> {
    let reps_path = format!("{}.reps", path);
    let reps = match doc.reps {
        None => return Err(ValidationError::missing(reps_path)),
        Some(reps) => non_negative(reps, &reps_path)?,
    };
    if reps.fract() != 0.0 {
        return Err(ValidationError::wrong_type(reps_path, "an integer"));
    }
    if reps > f64::from(u32::MAX) {
        return Err(ValidationError::out_of_range(reps_path, "must fit in 32 bits"));
    }

    let weight = doc
        .weight
        .map(|w| non_negative(w, &format!("{}.weight", path)))
        .transpose()?;

    let weight_unit = match doc.weight_unit.as_deref() {
        None => WeightUnit::default(),
        Some(unit) => WeightUnit::from_name(unit).ok_or_else(|| {
            ValidationError::wrong_enum(format!("{}.weightUnit", path), unit, WeightUnit::NAMES)
        })?,
    };

    Ok(ExerciseSet {
        reps: reps as u32,
        weight,
        weight_unit,
    })
}

impl ExerciseSetDocument {
    fn deserialize_from(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

impl TryFrom<&WorkoutDocument> for Workout {
    type Error = ValidationError;

    fn try_from(doc: &WorkoutDocument) -> Result<Self, Self::Error> {
        validate_workout(doc)
    }
}

impl Workout {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Attach the id assigned by the store
    pub(crate) fn with_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// When the session took place (not when it was saved)
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration
    }

    /// Entries in the order they were performed
    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Convert back into the document shape, with defaults explicit
    pub fn to_document(&self) -> WorkoutDocument {
        WorkoutDocument {
            id: self.id.clone(),
            user_id: Some(self.user_id.clone()),
            date: Some(self.date.to_rfc3339()),
            duration: Some(self.duration),
            exercises: Some(self.exercises.iter().map(ExerciseEntry::to_document).collect()),
        }
    }
}

impl ExerciseEntry {
    pub fn exercise_ref(&self) -> &ExerciseRef {
        &self.exercise_ref
    }

    /// Sets in the order they were performed
    pub fn sets(&self) -> &[ExerciseSet] {
        &self.sets
    }

    fn to_document(&self) -> ExerciseEntryDocument {
        ExerciseEntryDocument {
            exercise_ref: Some(ReferenceDocument::Id(self.exercise_ref.0.clone())),
            sets: Some(Value::Array(self.sets.iter().map(ExerciseSet::to_value).collect())),
        }
    }
}

impl ExerciseSet {
    pub fn reps(&self) -> u32 {
        self.reps
    }

    /// `None` means bodyweight / no load
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn weight_unit(&self) -> WeightUnit {
        self.weight_unit
    }

    /// Short label such as `8 reps @ 135lbs` or `12 reps` for bodyweight sets
    pub fn label(&self) -> String {
        let reps = if self.reps == 1 {
            "1 rep".to_string()
        } else {
            format!("{} reps", self.reps)
        };
        match self.weight {
            Some(weight) => format!("{} @ {}{}", reps, weight, self.weight_unit),
            None => reps,
        }
    }

    fn to_value(&self) -> Value {
        let mut value = json!({
            "reps": self.reps,
            "weightUnit": self.weight_unit.as_str(),
        });
        if let (Some(weight), Some(map)) = (self.weight, value.as_object_mut()) {
            map.insert("weight".into(), json!(weight));
        }
        value
    }
}
