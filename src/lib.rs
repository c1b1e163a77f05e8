//! Session lifecycle and calendar core for a personal fitness tracker.
//!
//! What lives here:
//! - [`session`]: the workout draft being built or edited, with dirty
//!   tracking and save/load
//! - [`calendar`]: pressed-date to time-window resolution against the
//!   schedule, plus the narrow past-date check the month view uses
//! - [`analysis`]: personal-record detection and calorie estimation for
//!   the completion summary
//! - [`history`] and [`profile`]: the persistence boundaries those
//!   computations depend on
//!
//! Screens hold a [`session::WorkoutSession`] per editing surface; nothing
//! in this crate is a process-wide singleton.

pub mod analysis;
pub mod calendar;
pub mod db;
pub mod history;
pub mod models;
pub mod profile;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use analysis::{detect_personal_records, estimate_calories, summarize_session, SessionSummary};
pub use calendar::{is_past_day, resolve_window, CalendarDay, DayWindow};
pub use db::{initialize_db, DbPool, StoreError};
pub use history::{record_completed_sets, SetHistory, SqliteSetHistory};
pub use models::{ExerciseEntry, ScheduledWorkout, SetEntry, SetRecord, WorkoutDraft};
pub use session::{DraftChange, DraftOrigin, WorkoutSession};
