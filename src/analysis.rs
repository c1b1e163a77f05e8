//! Deterministic session metrics
//!
//! Computes the summary shown when a workout is completed: how many
//! exercises set a new personal record, and an estimate of the energy
//! spent. Both treat incomplete inputs as "no determination possible" and
//! come back as a neutral zero rather than an error.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::history::SetHistory;
use crate::models::ExerciseEntry;

/// Fixed MET value for resistance training
const RESISTANCE_TRAINING_MET: f64 = 4.5;

/// ---------------------------------------------------------------------------
/// Calorie Estimation
/// ---------------------------------------------------------------------------

/// Estimate kilocalories burned for a session.
///
/// `duration` is the session timer's `MM:SS` string. Returns 0 when the
/// body weight is missing or non-positive, the duration is empty, or the
/// duration does not split into two numeric components.
///
/// Formula: `MET * weight_kg * duration_hours`, rounded to the nearest
/// whole kilocalorie.
pub fn estimate_calories(duration: &str, body_weight_kg: Option<f64>) -> i64 {
  let weight = match body_weight_kg {
    Some(w) if w > 0.0 => w,
    _ => return 0,
  };
  let Some(hours) = parse_duration_hours(duration) else {
    return 0;
  };

  let calories = RESISTANCE_TRAINING_MET * weight * hours;
  if !calories.is_finite() {
    return 0;
  }
  calories.round() as i64
}

/// Parse an `MM:SS` string into fractional hours
fn parse_duration_hours(duration: &str) -> Option<f64> {
  let (minutes, seconds) = duration.split_once(':')?;
  let minutes: f64 = minutes.parse().ok()?;
  let seconds: f64 = seconds.parse().ok()?;
  Some(minutes / 60.0 + seconds / 3600.0)
}

/// ---------------------------------------------------------------------------
/// Personal Record Detection
/// ---------------------------------------------------------------------------

/// Count the exercises in a completed workout that set a new all-time
/// weight record.
///
/// Per exercise the session max is the heaviest logged weight (missing
/// weights count as zero); a max of zero is not a record attempt. For the
/// rest, history is asked for any prior set that matches or beats the max
/// (a tie disqualifies). The lookups run concurrently, one per exercise,
/// and a failed lookup counts that exercise as "no record" without
/// touching the others.
pub async fn detect_personal_records<H>(history: &H, exercises: &[ExerciseEntry]) -> usize
where
  H: SetHistory + ?Sized,
{
  if exercises.is_empty() {
    return 0;
  }

  let outcomes = join_all(exercises.iter().map(|exercise| async move {
    let session_max = exercise.session_max_weight();
    if session_max <= 0.0 {
      return 0;
    }

    match history
      .sets_at_or_above(&exercise.exercise_id, session_max)
      .await
    {
      Ok(prior) if prior.is_empty() => 1,
      Ok(_) => 0,
      Err(e) => {
        tracing::warn!(
          exercise_id = %exercise.exercise_id,
          error = %e,
          "history lookup failed; counting no record"
        );
        0
      }
    }
  }))
  .await;

  outcomes.into_iter().sum()
}

/// ---------------------------------------------------------------------------
/// Session Summary
/// ---------------------------------------------------------------------------

/// Metrics shown on the workout-complete screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
  pub new_record_count: usize,
  pub estimated_calories: i64,
}

/// Compute the full completion summary for a finished workout
pub async fn summarize_session<H>(
  history: &H,
  exercises: &[ExerciseEntry],
  duration: &str,
  body_weight_kg: Option<f64>,
) -> SessionSummary
where
  H: SetHistory + ?Sized,
{
  SessionSummary {
    new_record_count: detect_personal_records(history, exercises).await,
    estimated_calories: estimate_calories(duration, body_weight_kg),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
