//! Core domain types for setbook.
//!
//! Every entity comes in two shapes:
//! - a *document* (`ExerciseDocument`, `WorkoutDocument`, ...) mirroring the
//!   loosely-typed content-store shape, where every field may be absent;
//! - a *validated* record (`Exercise`, `Workout`, ...) produced only by the
//!   validation functions, with all defaults made explicit.
//!
//! Validated records serialize back to the document shape, so a stored record
//! can always be parsed as a document and re-validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Enumerations
// ============================================================================

/// How challenging an exercise is
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const NAMES: &'static [&'static str] = &["beginner", "intermediate", "advanced"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Unit of the load lifted in a set
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub const NAMES: &'static [&'static str] = &["lbs", "kg"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lbs" => Some(WeightUnit::Lbs),
            "kg" => Some(WeightUnit::Kg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// References
// ============================================================================

/// A reference as it arrives from the content store: either a bare id or a
/// reference object `{ "_type": "reference", "_ref": "<id>" }`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ReferenceDocument {
    Id(String),
    Object {
        #[serde(rename = "_ref")]
        target: String,
        #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
}

impl ReferenceDocument {
    /// The referenced document id
    pub fn target(&self) -> &str {
        match self {
            ReferenceDocument::Id(id) => id,
            ReferenceDocument::Object { target, .. } => target,
        }
    }
}

/// Weak reference from a workout entry to a catalog exercise.
///
/// Holds only the exercise id; it never owns or pins the exercise and may
/// dangle once the exercise is removed from the catalog.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ExerciseRef(pub(crate) String);

impl ExerciseRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Exercise Documents and Records
// ============================================================================

/// Raw image item: an asset reference with optional alt text
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageDocument {
    pub asset: Option<ReferenceDocument>,
    pub alt: Option<String>,
}

/// Raw exercise document as delivered by the content store
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub images: Option<Vec<ImageDocument>>,
    pub image: Option<ImageDocument>,
    pub video_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Validated image
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Image {
    pub(crate) asset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) alt: Option<String>,
}

/// Validated catalog exercise
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) images: Vec<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) video_url: Option<String>,
    pub(crate) is_active: bool,
}

// ============================================================================
// Workout Documents and Records
// ============================================================================

/// Raw set document
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSetDocument {
    pub reps: Option<f64>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
}

/// Raw exercise entry document.
///
/// `sets` is kept as an untyped JSON value: the content store does not
/// guarantee it is an array, and summaries must tolerate that.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntryDocument {
    pub exercise_ref: Option<ReferenceDocument>,
    pub sets: Option<Value>,
}

/// Raw workout document
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: Option<String>,
    /// RFC 3339 timestamp of when the session took place
    pub date: Option<String>,
    /// Length of the session in seconds
    pub duration: Option<f64>,
    pub exercises: Option<Vec<ExerciseEntryDocument>>,
}

/// One validated set
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub(crate) reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) weight: Option<f64>,
    pub(crate) weight_unit: WeightUnit,
}

/// One exercise performed within a workout, with its sets in order
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub(crate) exercise_ref: ExerciseRef,
    pub(crate) sets: Vec<ExerciseSet>,
}

/// A validated workout session
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    pub(crate) user_id: String,
    pub(crate) date: DateTime<Utc>,
    pub(crate) duration: f64,
    pub(crate) exercises: Vec<ExerciseEntry>,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// Exercises known to the catalog, keyed by id
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: HashMap<String, Exercise>,
}
