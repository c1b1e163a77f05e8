use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder name for drafts the user has not renamed yet
pub const DEFAULT_WORKOUT_NAME: &str = "New workout";

/// A single logged set within an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
  pub weight: Option<f64>,
  pub reps: Option<i64>,
  pub rpe: Option<f64>,
  pub completed: bool,
}

impl SetEntry {
  pub fn new() -> Self {
    Self {
      weight: None,
      reps: None,
      rpe: None,
      completed: false,
    }
  }
}

impl Default for SetEntry {
  fn default() -> Self {
    Self::new()
  }
}

/// An exercise within a workout, owning its ordered sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEntry {
  pub exercise_id: String,
  pub name: String,
  pub sets: Vec<SetEntry>,
}

impl ExerciseEntry {
  pub fn new(exercise_id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      exercise_id: exercise_id.into(),
      name: name.into(),
      sets: Vec::new(),
    }
  }

  /// Heaviest weight among this exercise's sets; missing weights count as zero
  pub fn session_max_weight(&self) -> f64 {
    self
      .sets
      .iter()
      .map(|s| s.weight.unwrap_or(0.0))
      .fold(0.0, f64::max)
  }
}

/// The workout currently being built or edited
///
/// The draft exclusively owns its exercise/set tree; entries have no
/// lifecycle of their own. The id is generated client-side once, at
/// creation, and never regenerated for the same logical draft.
/// Structural equality goes through [`crate::session::drafts_differ`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDraft {
  pub id: String,
  pub name: String,
  pub user_id: String,
  pub split_id: Option<String>,
  pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutDraft {
  pub fn new(user_id: impl Into<String>, split_id: Option<String>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      name: DEFAULT_WORKOUT_NAME.to_string(),
      user_id: user_id.into(),
      split_id,
      exercises: Vec::new(),
    }
  }
}

/// A workout placed on the calendar; at most one per date per user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduledWorkout {
  pub id: i64,
  pub workout_id: Option<String>,
  /// Calendar date in `YYYY-MM-DD` form
  pub scheduled_date: String,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
}

/// A historical completed set, as stored in the set log
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SetRecord {
  pub id: i64,
  pub exercise_id: String,
  pub workout_id: Option<String>,
  pub weight: f64,
  pub reps: i64,
  pub rpe: Option<f64>,
  pub logged_at: DateTime<Utc>,
}

/// User profile fields the session core reads and updates
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
  pub user_id: String,
  pub display_name: Option<String>,
  pub body_weight_kg: Option<f64>,
  pub current_split_id: Option<String>,
  pub updated_at: Option<DateTime<Utc>>,
}
