//! Calendar reconciliation
//!
//! Maps a pressed calendar date onto a concrete editable time window. If a
//! workout is already scheduled on that date its stored window is reused
//! as-is, so editing an existing schedule never loses its times; otherwise
//! a default afternoon window is derived on the pressed date.

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{DbPool, StoreError};
use crate::models::ScheduledWorkout;

/// Default window for dates with nothing scheduled: 16:00-17:30 local
const DEFAULT_START: (u32, u32) = (16, 0);
const DEFAULT_END: (u32, u32) = (17, 30);

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
/// Day Window
// ---------------------------------------------------------------------------

/// The editable start/end window for one calendar day. Both ends are
/// absolute timestamps fully qualified to the pressed date, not
/// time-of-day values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
}

impl DayWindow {
    /// Manual override from the scheduling UI
    pub fn set_start(&mut self, start: DateTime<Local>) {
        self.start_time = start;
    }

    pub fn set_end(&mut self, end: DateTime<Local>) {
        self.end_time = end;
    }
}

// ---------------------------------------------------------------------------
/// Window Resolution
// ---------------------------------------------------------------------------

/// Resolve the time window for a pressed `YYYY-MM-DD` calendar date.
///
/// The schedule is searched by exact string equality on the date component;
/// no timezone shifting or date arithmetic is applied, and at most one
/// scheduled workout is assumed per date. On a miss the default window is
/// built from the date string's components (month is 1-indexed).
pub fn resolve_window(
    pressed_date: &str,
    scheduled: &[ScheduledWorkout],
) -> Result<DayWindow, CalendarError> {
    if let Some(existing) = scheduled.iter().find(|w| w.scheduled_date == pressed_date) {
        return Ok(DayWindow {
            start_time: existing.start_time.with_timezone(&Local),
            end_time: existing.end_time.with_timezone(&Local),
        });
    }

    let (year, month, day) = parse_date_string(pressed_date)?;
    let start_time = local_timestamp(year, month, day, DEFAULT_START, pressed_date)?;
    let end_time = local_timestamp(year, month, day, DEFAULT_END, pressed_date)?;

    Ok(DayWindow { start_time, end_time })
}

fn parse_date_string(date: &str) -> Result<(i32, u32, u32), CalendarError> {
    let invalid = || CalendarError::InvalidDate(date.to_string());

    let mut parts = date.split('-');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let month: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok((year, month, day))
}

fn local_timestamp(
    year: i32,
    month: u32,
    day: u32,
    (hour, minute): (u32, u32),
    date: &str,
) -> Result<DateTime<Local>, CalendarError> {
    pick_wall_clock(Local.with_ymd_and_hms(year, month, day, hour, minute, 0))
        .ok_or_else(|| CalendarError::InvalidDate(date.to_string()))
}

/// A wall-clock time that exists twice across a DST fold resolves to the
/// earlier instant; only a nonexistent time is rejected.
fn pick_wall_clock(result: LocalResult<DateTime<Local>>) -> Option<DateTime<Local>> {
    result.earliest()
}

// ---------------------------------------------------------------------------
/// Past-Date Classifier
// ---------------------------------------------------------------------------

/// A calendar cell as the month view addresses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDay {
    pub fn today() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: now.month(),
            day: now.day(),
        }
    }
}

/// True only for days earlier in the current month. Days in any other
/// month or year are never "past", even when chronologically earlier;
/// the month view relies on this narrow semantic and it must not be
/// generalized to a full date comparison.
pub fn is_past_day(day: &CalendarDay) -> bool {
    is_earlier_in_month(day, &CalendarDay::today())
}

fn is_earlier_in_month(day: &CalendarDay, today: &CalendarDay) -> bool {
    day.year == today.year && day.month == today.month && day.day < today.day
}

// ---------------------------------------------------------------------------
/// Schedule Store
// ---------------------------------------------------------------------------

/// Load the full schedule, ordered by date
pub async fn load_schedule(pool: &DbPool) -> Result<Vec<ScheduledWorkout>, StoreError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, workout_id, scheduled_date, start_time, end_time
        FROM scheduled_workouts
        ORDER BY scheduled_date
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert or replace the schedule entry for a date. The date column is
/// unique, so re-scheduling a day updates its window in place.
pub async fn upsert_scheduled_workout(
    pool: &DbPool,
    scheduled_date: &str,
    window: &DayWindow,
    workout_id: Option<&str>,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO scheduled_workouts (workout_id, scheduled_date, start_time, end_time)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(scheduled_date) DO UPDATE SET
          workout_id = excluded.workout_id,
          start_time = excluded.start_time,
          end_time = excluded.end_time
        "#,
    )
    .bind(workout_id)
    .bind(scheduled_date)
    .bind(window.start_time.with_timezone(&Utc))
    .bind(window.end_time.with_timezone(&Utc))
    .execute(pool)
    .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use chrono::Timelike;

    fn scheduled(date: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduledWorkout {
        ScheduledWorkout {
            id: 1,
            workout_id: None,
            scheduled_date: date.to_string(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_default_window_on_empty_schedule() {
        let window = resolve_window("2026-03-14", &[]).expect("valid date");

        assert_eq!(window.start_time.hour(), 16);
        assert_eq!(window.start_time.minute(), 0);
        assert_eq!(window.end_time.hour(), 17);
        assert_eq!(window.end_time.minute(), 30);
        assert_eq!(window.start_time.year(), 2026);
        assert_eq!(window.start_time.month(), 3);
        assert_eq!(window.start_time.day(), 14);
        assert_eq!(window.end_time.day(), 14);
    }

    #[test]
    fn test_existing_schedule_window_is_reused_unmodified() {
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 6, 15, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 14, 7, 45, 0).unwrap();
        let schedule = vec![scheduled("2026-03-14", start, end)];

        let window = resolve_window("2026-03-14", &schedule).expect("valid date");

        assert_eq!(window.start_time.with_timezone(&Utc), start);
        assert_eq!(window.end_time.with_timezone(&Utc), end);
    }

    #[test]
    fn test_date_match_is_exact_string_equality() {
        let start = Utc.with_ymd_and_hms(2026, 3, 7, 6, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 7, 7, 0, 0).unwrap();
        // Unpadded variant of the same day must not match
        let schedule = vec![scheduled("2026-3-7", start, end)];

        let window = resolve_window("2026-03-07", &schedule).expect("valid date");

        assert_eq!(window.start_time.hour(), 16);
        assert_eq!(window.end_time.minute(), 30);
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        assert!(matches!(
            resolve_window("not-a-date", &[]),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(matches!(
            resolve_window("2026-13-40", &[]),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(matches!(
            resolve_window("2026-03-14-00", &[]),
            Err(CalendarError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_ambiguous_wall_clock_resolves_to_earlier_instant() {
        let first = Local.with_ymd_and_hms(2026, 3, 14, 1, 0, 0).unwrap();
        let second = Local.with_ymd_and_hms(2026, 3, 14, 2, 0, 0).unwrap();

        assert_eq!(pick_wall_clock(LocalResult::Ambiguous(first, second)), Some(first));
        assert_eq!(pick_wall_clock(LocalResult::Single(first)), Some(first));
        assert_eq!(pick_wall_clock(LocalResult::None), None);
    }

    #[test]
    fn test_window_manual_override() {
        let mut window = resolve_window("2026-03-14", &[]).expect("valid date");
        let new_start = Local.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        window.set_start(new_start);

        assert_eq!(window.start_time, new_start);
        assert_eq!(window.end_time.hour(), 17);
    }

    #[test]
    fn test_past_day_is_same_month_only() {
        let today = CalendarDay { year: 2026, month: 8, day: 30 };

        let yesterday = CalendarDay { year: 2026, month: 8, day: 29 };
        assert!(is_earlier_in_month(&yesterday, &today));

        assert!(!is_earlier_in_month(&today, &today));

        // Same day number in a different month is not "past"
        let last_month = CalendarDay { year: 2026, month: 7, day: 29 };
        assert!(!is_earlier_in_month(&last_month, &today));

        // A whole year earlier is not "past" either
        let last_year = CalendarDay { year: 2025, month: 8, day: 29 };
        assert!(!is_earlier_in_month(&last_year, &today));

        let tomorrow = CalendarDay { year: 2026, month: 8, day: 31 };
        assert!(!is_earlier_in_month(&tomorrow, &today));
    }

    #[test]
    fn test_is_past_day_today_is_not_past() {
        assert!(!is_past_day(&CalendarDay::today()));
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_date() {
        let pool = setup_test_db().await;

        let first = resolve_window("2026-03-14", &[]).expect("valid date");
        upsert_scheduled_workout(&pool, "2026-03-14", &first, None)
            .await
            .expect("first upsert");

        let mut second = first.clone();
        second.set_start(Local.with_ymd_and_hms(2026, 3, 14, 7, 0, 0).unwrap());
        upsert_scheduled_workout(&pool, "2026-03-14", &second, Some("w-1"))
            .await
            .expect("second upsert");

        let schedule = load_schedule(&pool).await.expect("load schedule");
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].workout_id.as_deref(), Some("w-1"));
        assert_eq!(
            schedule[0].start_time,
            second.start_time.with_timezone(&Utc)
        );
    }

    #[tokio::test]
    async fn test_load_schedule_orders_by_date() {
        let pool = setup_test_db().await;

        for date in ["2026-03-20", "2026-03-01", "2026-03-14"] {
            let window = resolve_window(date, &[]).expect("valid date");
            upsert_scheduled_workout(&pool, date, &window, None)
                .await
                .expect("upsert");
        }

        let schedule = load_schedule(&pool).await.expect("load schedule");
        let dates: Vec<_> = schedule.iter().map(|w| w.scheduled_date.as_str()).collect();
        assert_eq!(dates, vec!["2026-03-01", "2026-03-14", "2026-03-20"]);
    }

    #[tokio::test]
    async fn test_resolver_reuses_stored_schedule_round_trip() {
        let pool = setup_test_db().await;

        let saved = resolve_window("2026-04-02", &[]).expect("valid date");
        upsert_scheduled_workout(&pool, "2026-04-02", &saved, None)
            .await
            .expect("upsert");

        let schedule = load_schedule(&pool).await.expect("load schedule");
        let resolved = resolve_window("2026-04-02", &schedule).expect("valid date");

        assert_eq!(resolved, saved);
    }
}
