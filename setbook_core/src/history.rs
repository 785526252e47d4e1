//! Per-user workout history.
//!
//! Loads a user's workouts from the store, newest first, with an optional
//! day window.

use crate::store::read_workouts;
use crate::{Result, Workout};
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::path::Path;

/// Load the workouts belonging to `user_id`.
///
/// Returns workouts sorted by date (newest first). Records sharing an id are
/// collapsed to the first one stored. With `days`, only workouts performed in
/// the last N days are returned.
pub fn load_user_workouts(
    store_path: &Path,
    user_id: &str,
    days: Option<i64>,
) -> Result<Vec<Workout>> {
    let cutoff = days.map(|d| Utc::now() - Duration::days(d));
    let mut seen_ids = HashSet::new();

    let mut workouts: Vec<Workout> = read_workouts(store_path)?
        .into_iter()
        .filter(|w| w.user_id() == user_id)
        .filter(|w| cutoff.map_or(true, |c| w.date() >= c))
        .filter(|w| match w.id() {
            Some(id) => seen_ids.insert(id.to_string()),
            None => true,
        })
        .collect();

    // Stable sort keeps append order for sessions on the same timestamp
    workouts.sort_by(|a, b| b.date().cmp(&a.date()));

    tracing::info!(
        "Loaded {} workouts for user {}",
        workouts.len(),
        user_id
    );

    Ok(workouts)
}

/// Find a workout by id
pub fn find_workout<'a>(workouts: &'a [Workout], id: &str) -> Option<&'a Workout> {
    workouts.iter().find(|w| w.id() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonlStore, WorkoutSink};
    use crate::workout::validate_workout;
    use crate::WorkoutDocument;
    use serde_json::json;

    fn create_test_workout(user_id: &str, days_ago: i64, id: Option<&str>) -> Workout {
        let mut value = json!({
            "userId": user_id,
            "date": (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
            "duration": 1200,
            "exercises": [{"exerciseRef": "push_up", "sets": [{"reps": 20}]}],
        });
        if let Some(id) = id {
            value["_id"] = json!(id);
        }
        let doc: WorkoutDocument = serde_json::from_value(value).unwrap();
        validate_workout(&doc).unwrap()
    }

    #[test]
    fn test_filters_by_user_and_sorts_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.jsonl");

        let mut store = JsonlStore::new(&path);
        store.append(create_test_workout("alice", 5, Some("old"))).unwrap();
        store.append(create_test_workout("bob", 1, None)).unwrap();
        store.append(create_test_workout("alice", 1, Some("new"))).unwrap();

        let workouts = load_user_workouts(&path, "alice", None).unwrap();
        let ids: Vec<_> = workouts.iter().map(|w| w.id().unwrap()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_day_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.jsonl");

        let mut store = JsonlStore::new(&path);
        store.append(create_test_workout("alice", 1, None)).unwrap();
        store.append(create_test_workout("alice", 3, None)).unwrap();
        store.append(create_test_workout("alice", 10, None)).unwrap(); // Too old

        assert_eq!(load_user_workouts(&path, "alice", Some(7)).unwrap().len(), 2);
        assert_eq!(load_user_workouts(&path, "alice", None).unwrap().len(), 3);
    }

    #[test]
    fn test_deduplicates_hand_edited_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.jsonl");

        // The store refuses repeated ids, but a copied line can still appear
        let first = create_test_workout("alice", 2, Some("dup"));
        let second = create_test_workout("alice", 1, Some("dup"));
        let contents = format!(
            "{}\n{}\n",
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        std::fs::write(&path, contents).unwrap();

        let workouts = load_user_workouts(&path, "alice", None).unwrap();
        assert_eq!(workouts, vec![first]);
    }

    #[test]
    fn test_find_workout() {
        let workouts = vec![
            create_test_workout("alice", 1, Some("a")),
            create_test_workout("alice", 2, Some("b")),
        ];

        assert_eq!(find_workout(&workouts, "b").unwrap().id(), Some("b"));
        assert!(find_workout(&workouts, "c").is_none());
    }
}
