//! Test utilities and helpers
//!
//! Common test infrastructure: in-memory database setup, history seeding,
//! and mock data factories for drafts and exercises.

use crate::models::{ExerciseEntry, SetEntry, WorkoutDraft};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Seed historical sets for one exercise, one row per weight
pub async fn seed_set_history(pool: &SqlitePool, exercise_id: &str, weights: &[f64]) {
  for weight in weights {
    sqlx::query(
      r#"
      INSERT INTO set_history (exercise_id, workout_id, weight, reps)
      VALUES (?1, NULL, ?2, 5)
      "#,
    )
    .bind(exercise_id)
    .bind(weight)
    .execute(pool)
    .await
    .expect("Failed to seed set history");
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create an exercise with completed sets from (weight, reps) pairs
pub fn mock_exercise(exercise_id: &str, sets: &[(f64, i64)]) -> ExerciseEntry {
  let mut exercise = ExerciseEntry::new(exercise_id, exercise_id);
  for (weight, reps) in sets {
    exercise.sets.push(SetEntry {
      weight: Some(*weight),
      reps: Some(*reps),
      rpe: None,
      completed: true,
    });
  }
  exercise
}

/// Create a draft with a single benched exercise, for store tests
pub fn mock_draft(user_id: &str) -> WorkoutDraft {
  let mut draft = WorkoutDraft::new(user_id, None);
  draft.exercises.push(mock_exercise("bench", &[(100.0, 5)]));
  draft
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'scheduled_workouts', 'set_history', 'user_profiles')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());
  }

  #[tokio::test]
  async fn test_seed_history_inserts_rows() {
    let pool = setup_test_db().await;
    seed_set_history(&pool, "bench", &[95.0, 100.0, 102.5]).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM set_history")
      .fetch_one(&pool)
      .await
      .expect("Failed to count history rows");
    assert_eq!(count, 3);
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let exercise = mock_exercise("bench", &[(100.0, 5), (102.5, 3)]);
    assert_eq!(exercise.sets.len(), 2);
    assert!(exercise.sets.iter().all(|s| s.completed));
    assert_eq!(exercise.session_max_weight(), 102.5);

    let draft = mock_draft("user-1");
    assert_eq!(draft.user_id, "user-1");
    assert_eq!(draft.exercises.len(), 1);
  }
}
