//! Set-history boundary
//!
//! Personal-record detection only needs one question answered: does any
//! prior set for this exercise already match or beat a given weight? The
//! `SetHistory` trait keeps that question mockable; the SQLite
//! implementation answers it from the `set_history` log.

use async_trait::async_trait;

use crate::db::{DbPool, StoreError};
use crate::models::{SetRecord, WorkoutDraft};

#[async_trait]
pub trait SetHistory: Send + Sync {
    /// Prior sets for `exercise_id` with weight >= `weight`. An empty vec
    /// (not an error) signals that no qualifying prior set exists.
    async fn sets_at_or_above(
        &self,
        exercise_id: &str,
        weight: f64,
    ) -> Result<Vec<SetRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
/// SQLite Implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SqliteSetHistory {
    pool: DbPool,
}

impl SqliteSetHistory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetHistory for SqliteSetHistory {
    async fn sets_at_or_above(
        &self,
        exercise_id: &str,
        weight: f64,
    ) -> Result<Vec<SetRecord>, StoreError> {
        let rows = sqlx::query_as(
            r#"
            SELECT id, exercise_id, workout_id, weight, reps, rpe, logged_at
            FROM set_history
            WHERE exercise_id = ?1 AND weight >= ?2
            "#,
        )
        .bind(exercise_id)
        .bind(weight)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
/// Recording
// ---------------------------------------------------------------------------

/// Append the draft's completed, weighted sets to the history log.
/// Incomplete sets and sets without a weight never enter history, so they
/// can never block a future record. Returns the number of rows written.
pub async fn record_completed_sets(
    pool: &DbPool,
    draft: &WorkoutDraft,
) -> Result<u64, StoreError> {
    let mut written = 0;

    for exercise in &draft.exercises {
        for set in &exercise.sets {
            let Some(weight) = set.weight else { continue };
            if !set.completed || weight <= 0.0 {
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO set_history (exercise_id, workout_id, weight, reps, rpe)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&exercise.exercise_id)
            .bind(&draft.id)
            .bind(weight)
            .bind(set.reps.unwrap_or(0))
            .bind(set.rpe)
            .execute(pool)
            .await?;

            written += 1;
        }
    }

    tracing::debug!(workout_id = %draft.id, rows = written, "recorded completed sets");
    Ok(written)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
