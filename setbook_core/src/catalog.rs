//! Exercise catalog and weak-reference resolution.
//!
//! The catalog is the lookup a storage collaborator supplies for
//! `exerciseRef` values. A workout never holds an exercise directly; callers
//! resolve references here and decide what to show when one dangles.

use crate::exercise::validate_exercise;
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the built-in seed catalog
pub fn build_default_catalog() -> Catalog {
    let exercises = vec![
        Exercise::seed(
            "bench_press",
            "Barbell Bench Press",
            "Lie on a flat bench, lower the bar to mid-chest and press it back to lockout.",
            Difficulty::Intermediate,
            Some("https://www.youtube.com/watch?v=rT7DgCr-3pg"),
        ),
        Exercise::seed(
            "back_squat",
            "Barbell Back Squat",
            "Bar on the upper back, sit down between the heels until the hip crease passes the knee, then stand.",
            Difficulty::Intermediate,
            Some("https://www.youtube.com/watch?v=ultWZbUMPL8"),
        ),
        Exercise::seed(
            "deadlift",
            "Conventional Deadlift",
            "Hinge to grip the bar, brace, and drive through the floor until hips and knees lock out.",
            Difficulty::Advanced,
            Some("https://www.youtube.com/watch?v=op9kVnSso6Q"),
        ),
        Exercise::seed(
            "overhead_press",
            "Overhead Press",
            "Press the bar from the front rack to overhead, moving the head through at the top.",
            Difficulty::Intermediate,
            None,
        ),
        Exercise::seed(
            "pull_up",
            "Pull-up",
            "Hang from the bar with an overhand grip and pull until the chin clears it.",
            Difficulty::Intermediate,
            Some("https://www.youtube.com/watch?v=eGo4IYlbE5g"),
        ),
        Exercise::seed(
            "push_up",
            "Push-up",
            "From a plank, lower the chest to the floor and press back up keeping the body rigid.",
            Difficulty::Beginner,
            None,
        ),
        Exercise::seed(
            "goblet_squat",
            "Goblet Squat",
            "Hold a kettlebell or dumbbell at the chest and squat between the knees.",
            Difficulty::Beginner,
            None,
        ),
        Exercise::seed(
            "kipping_pull_up",
            "Kipping Pull-up",
            "Pull-up driven by a hip swing.",
            Difficulty::Advanced,
            None,
        )
        .retired(),
    ];

    let exercises = exercises
        .into_iter()
        .filter_map(|e| {
            let id = e.id()?.to_string();
            Some((id, e))
        })
        .collect();

    Catalog { exercises }
}

impl Catalog {
    /// Add a validated exercise. Catalog entries must carry a unique id.
    pub fn insert(&mut self, exercise: Exercise) -> Result<()> {
        let id = exercise
            .id()
            .ok_or_else(|| Error::Catalog(format!("Exercise '{}' has no id", exercise.name())))?
            .to_string();
        if self.exercises.contains_key(&id) {
            return Err(Error::Catalog(format!("Duplicate exercise id '{}'", id)));
        }
        self.exercises.insert(id, exercise);
        Ok(())
    }

    /// Load a catalog from a JSON array of exercise documents.
    ///
    /// The first invalid document fails the whole load; its index is
    /// prefixed to the error path (e.g. `[2].difficulty`).
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let documents: Vec<ExerciseDocument> = serde_json::from_str(&contents)?;

        let mut catalog = Catalog::default();
        for (i, doc) in documents.iter().enumerate() {
            let exercise = validate_exercise(doc).map_err(|e| e.nested(&format!("[{}]", i)))?;
            catalog.insert(exercise)?;
        }

        tracing::info!(
            "Loaded {} exercises from catalog {:?}",
            catalog.exercises.len(),
            path
        );
        Ok(catalog)
    }

    /// Validate the catalog for consistency.
    ///
    /// Returns a list of problems, or an empty Vec if consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, exercise) in &self.exercises {
            if id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if exercise.id() != Some(id.as_str()) {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise id '{}'",
                    id,
                    exercise.id().unwrap_or("<none>")
                ));
            }
            if exercise.name().trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
        }

        errors
    }

    /// Exercises visible in consumer-facing listings, sorted by name
    pub fn active(&self) -> Vec<&Exercise> {
        let mut active: Vec<&Exercise> = self.exercises.values().filter(|e| e.is_active()).collect();
        active.sort_by(|a, b| a.name().cmp(b.name()));
        active
    }

    /// Every exercise including inactive ones, sorted by name
    pub fn all(&self) -> Vec<&Exercise> {
        let mut all: Vec<&Exercise> = self.exercises.values().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }
}

// ============================================================================
// Reference Resolution
// ============================================================================

/// Lookup of exercises by id, supplied by whoever stores the catalog
pub trait ExerciseLookup {
    fn find_exercise(&self, id: &str) -> Option<&Exercise>;
}

impl ExerciseLookup for Catalog {
    fn find_exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }
}

impl ExerciseLookup for HashMap<String, Exercise> {
    fn find_exercise(&self, id: &str) -> Option<&Exercise> {
        self.get(id)
    }
}

/// Outcome of resolving a weak reference
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution<'a> {
    Found(&'a Exercise),
    Dangling(&'a ExerciseRef),
}

pub fn resolve<'a, L>(lookup: &'a L, reference: &'a ExerciseRef) -> Resolution<'a>
where
    L: ExerciseLookup + ?Sized,
{
    match lookup.find_exercise(reference.as_str()) {
        Some(exercise) => Resolution::Found(exercise),
        None => Resolution::Dangling(reference),
    }
}

/// References in `workout` that the lookup cannot resolve, in entry order
pub fn dangling_refs<'w, L>(lookup: &L, workout: &'w Workout) -> Vec<&'w ExerciseRef>
where
    L: ExerciseLookup + ?Sized,
{
    workout
        .exercises()
        .iter()
        .map(ExerciseEntry::exercise_ref)
        .filter(|r| lookup.find_exercise(r.as_str()).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::validate_workout;
    use serde_json::json;

    fn workout_referencing(refs: &[&str]) -> Workout {
        let exercises: Vec<_> = refs
            .iter()
            .map(|r| json!({"exerciseRef": {"_type": "reference", "_ref": r}, "sets": [{"reps": 5}]}))
            .collect();
        let doc: WorkoutDocument = serde_json::from_value(json!({
            "userId": "u1",
            "date": "2024-02-01T07:00:00Z",
            "duration": 900,
            "exercises": exercises,
        }))
        .unwrap();
        validate_workout(&doc).unwrap()
    }

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.exercises.len(), 8);
        assert_eq!(catalog.active().len(), 7);
        assert_eq!(catalog.all().len(), 8);
    }

    #[test]
    fn test_default_catalog_validates() {
        let errors = get_default_catalog().validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_active_listing_hides_retired_and_is_sorted() {
        let catalog = build_default_catalog();
        let names: Vec<&str> = catalog.active().iter().map(|e| e.name()).collect();

        assert!(!names.contains(&"Kipping Pull-up"));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_resolve_found_and_dangling() {
        let catalog = build_default_catalog();
        let workout = workout_referencing(&["deadlift", "removed_exercise"]);
        let entries = workout.exercises();

        match resolve(&catalog, entries[0].exercise_ref()) {
            Resolution::Found(exercise) => assert_eq!(exercise.name(), "Conventional Deadlift"),
            other => panic!("Expected Found, got {:?}", other),
        }
        assert_eq!(
            resolve(&catalog, entries[1].exercise_ref()),
            Resolution::Dangling(entries[1].exercise_ref())
        );
    }

    #[test]
    fn test_retired_exercise_still_resolves() {
        let catalog = build_default_catalog();
        let workout = workout_referencing(&["kipping_pull_up"]);
        assert!(dangling_refs(&catalog, &workout).is_empty());
    }

    #[test]
    fn test_dangling_refs_in_entry_order() {
        let catalog = build_default_catalog();
        let workout = workout_referencing(&["gone_b", "push_up", "gone_a"]);

        let dangling: Vec<&str> = dangling_refs(&catalog, &workout)
            .into_iter()
            .map(ExerciseRef::as_str)
            .collect();
        assert_eq!(dangling, vec!["gone_b", "gone_a"]);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"_id": "lunge", "name": "Walking Lunge", "difficulty": "beginner"},
                {"_id": "dip", "name": "Ring Dip", "isActive": false}
            ]"#,
        )
        .unwrap();

        let catalog = Catalog::load_from(&path).unwrap();
        assert_eq!(catalog.exercises.len(), 2);
        assert_eq!(catalog.active().len(), 1);
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn test_load_from_rejects_invalid_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"_id": "a", "name": "A"}, {"_id": "b", "name": "B", "difficulty": "elite"}]"#,
        )
        .unwrap();

        match Catalog::load_from(&path) {
            Err(Error::Validation(e)) => assert_eq!(e.path, "[1].difficulty"),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_rejects_duplicates_and_missing_ids() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");

        std::fs::write(&path, r#"[{"_id": "a", "name": "A"}, {"_id": "a", "name": "A2"}]"#)
            .unwrap();
        assert!(matches!(Catalog::load_from(&path), Err(Error::Catalog(_))));

        std::fs::write(&path, r#"[{"name": "No Id"}]"#).unwrap();
        assert!(matches!(Catalog::load_from(&path), Err(Error::Catalog(_))));
    }
}
