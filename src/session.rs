//! Workout session lifecycle
//!
//! Holds the draft currently being built or edited, tracks whether it has
//! unsaved changes, and persists it on demand. The draft itself is a plain
//! value; every transition here either returns derived state or replaces a
//! field and raises the dirty flag. The flag only comes back down through
//! an explicit save or discard.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbPool, StoreError};
use crate::models::{ExerciseEntry, SetEntry, WorkoutDraft};

// ---------------------------------------------------------------------------
/// Draft Origin: new vs loaded
// ---------------------------------------------------------------------------

/// Whether the draft was started fresh or hydrated from a saved workout.
/// Tracked separately from dirtiness: a loaded draft starts clean, and a
/// new draft stays "new" no matter how much it is edited until first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftOrigin {
    New,
    Loaded,
}

// ---------------------------------------------------------------------------
/// Field Updates
// ---------------------------------------------------------------------------

/// A single top-level field replacement on the draft
#[derive(Debug, Clone)]
pub enum DraftChange {
    Rename(String),
    BindUser(String),
    AssignSplit(Option<String>),
    ReplaceExercises(Vec<ExerciseEntry>),
}

// ---------------------------------------------------------------------------
/// Workout Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WorkoutSession {
    /// Snapshot of the draft as last saved (or as created)
    original: WorkoutDraft,
    draft: WorkoutDraft,
    origin: DraftOrigin,
    dirty: bool,
}

impl WorkoutSession {
    /// Start a brand-new session: fresh id, placeholder name, no exercises
    pub fn start_new(user_id: &str, split_id: Option<&str>) -> Self {
        let draft = WorkoutDraft::new(user_id, split_id.map(str::to_string));
        Self {
            original: draft.clone(),
            draft,
            origin: DraftOrigin::New,
            dirty: false,
        }
    }

    /// Wrap a draft hydrated from a saved workout
    pub fn from_saved(draft: WorkoutDraft) -> Self {
        Self {
            original: draft.clone(),
            draft,
            origin: DraftOrigin::Loaded,
            dirty: false,
        }
    }

    pub fn draft(&self) -> &WorkoutDraft {
        &self.draft
    }

    pub fn origin(&self) -> DraftOrigin {
        self.origin
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace one top-level field. Any call raises the dirty flag, even if
    /// the new value equals the old one.
    pub fn apply(&mut self, change: DraftChange) {
        match change {
            DraftChange::Rename(name) => self.draft.name = name,
            DraftChange::BindUser(user_id) => self.draft.user_id = user_id,
            DraftChange::AssignSplit(split_id) => self.draft.split_id = split_id,
            DraftChange::ReplaceExercises(exercises) => self.draft.exercises = exercises,
        }
        self.dirty = true;
    }

    pub fn add_exercise(&mut self, exercise: ExerciseEntry) {
        self.draft.exercises.push(exercise);
        self.dirty = true;
    }

    pub fn add_set(&mut self, exercise_idx: usize, set: SetEntry) -> bool {
        match self.draft.exercises.get_mut(exercise_idx) {
            Some(exercise) => {
                exercise.sets.push(set);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn update_set(&mut self, exercise_idx: usize, set_idx: usize, set: SetEntry) -> bool {
        match self
            .draft
            .exercises
            .get_mut(exercise_idx)
            .and_then(|e| e.sets.get_mut(set_idx))
        {
            Some(slot) => {
                *slot = set;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn toggle_set_completed(&mut self, exercise_idx: usize, set_idx: usize) -> bool {
        match self
            .draft
            .exercises
            .get_mut(exercise_idx)
            .and_then(|e| e.sets.get_mut(set_idx))
        {
            Some(slot) => {
                slot.completed = !slot.completed;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Structural comparison against the saved snapshot, independent of the
    /// dirty flag (the flag can be raised by a no-op field write).
    pub fn has_unsaved_changes(&self) -> bool {
        drafts_differ(&self.original, &self.draft)
    }

    /// Rebase the snapshot onto the current draft and clear the dirty flag.
    /// After the first save a "new" draft becomes "loaded".
    pub fn mark_saved(&mut self) {
        self.original = self.draft.clone();
        self.origin = DraftOrigin::Loaded;
        self.dirty = false;
    }

    /// Throw away edits and restore the saved snapshot
    pub fn discard(&mut self) {
        self.draft = self.original.clone();
        self.dirty = false;
    }
}

// ---------------------------------------------------------------------------
/// Deep Structural Comparison
// ---------------------------------------------------------------------------

/// Deep inequality over the full draft shape, nested collections included.
/// Vectors are ordered: a length mismatch or any index-wise difference makes
/// the drafts differ. Optional scalars are compared terminally, never
/// recursed into.
pub fn drafts_differ(a: &WorkoutDraft, b: &WorkoutDraft) -> bool {
    a.id != b.id
        || a.name != b.name
        || a.user_id != b.user_id
        || a.split_id != b.split_id
        || exercises_differ(&a.exercises, &b.exercises)
}

fn exercises_differ(a: &[ExerciseEntry], b: &[ExerciseEntry]) -> bool {
    if a.len() != b.len() {
        return true;
    }
    a.iter().zip(b).any(|(x, y)| {
        x.exercise_id != y.exercise_id || x.name != y.name || sets_differ(&x.sets, &y.sets)
    })
}

fn sets_differ(a: &[SetEntry], b: &[SetEntry]) -> bool {
    if a.len() != b.len() {
        return true;
    }
    a.iter().zip(b).any(|(x, y)| {
        x.weight != y.weight || x.reps != y.reps || x.rpe != y.rpe || x.completed != y.completed
    })
}

// ---------------------------------------------------------------------------
/// Persistence
// ---------------------------------------------------------------------------

#[derive(Debug, FromRow)]
struct WorkoutRow {
    id: String,
    name: String,
    user_id: String,
    split_id: Option<String>,
    exercises_json: String,
}

/// Upsert the session's draft and clear its dirty state
pub async fn save_workout(pool: &DbPool, session: &mut WorkoutSession) -> Result<(), StoreError> {
    let draft = &session.draft;
    let exercises_json = serde_json::to_string(&draft.exercises)?;

    sqlx::query(
        r#"
        INSERT INTO workouts (id, name, user_id, split_id, exercises_json, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(id) DO UPDATE SET
          name = excluded.name,
          user_id = excluded.user_id,
          split_id = excluded.split_id,
          exercises_json = excluded.exercises_json,
          updated_at = excluded.updated_at
        "#,
    )
    .bind(&draft.id)
    .bind(&draft.name)
    .bind(&draft.user_id)
    .bind(&draft.split_id)
    .bind(&exercises_json)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    session.mark_saved();
    Ok(())
}

/// Hydrate a saved workout into a clean, `Loaded` session
pub async fn load_workout(pool: &DbPool, id: &str) -> Result<Option<WorkoutSession>, StoreError> {
    let row: Option<WorkoutRow> = sqlx::query_as(
        "SELECT id, name, user_id, split_id, exercises_json FROM workouts WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let exercises: Vec<ExerciseEntry> = serde_json::from_str(&row.exercises_json)?;
    let draft = WorkoutDraft {
        id: row.id,
        name: row.name,
        user_id: row.user_id,
        split_id: row.split_id,
        exercises,
    };

    Ok(Some(WorkoutSession::from_saved(draft)))
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
