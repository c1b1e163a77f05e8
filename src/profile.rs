//! Profile boundary
//!
//! The session core reads the profile for the owner's body weight (calorie
//! estimation) and active split, and writes back partial updates from the
//! workout/split selection flows.

use crate::db::{DbPool, StoreError};
use crate::models::UserProfile;
use chrono::Utc;

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub body_weight_kg: Option<f64>,
    pub current_split_id: Option<String>,
}

/// Fetch a profile by user id. A missing row is `Ok(None)`, not an error;
/// any other failure propagates to the caller.
pub async fn fetch_user_profile(
    pool: &DbPool,
    user_id: &str,
) -> Result<Option<UserProfile>, StoreError> {
    let profile = sqlx::query_as(
        r#"
        SELECT user_id, display_name, body_weight_kg, current_split_id, updated_at
        FROM user_profiles
        WHERE user_id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Apply a partial update, creating the row on first write
pub async fn update_user_profile(
    pool: &DbPool,
    user_id: &str,
    update: &ProfileUpdate,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, display_name, body_weight_kg, current_split_id, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(user_id) DO UPDATE SET
          display_name = COALESCE(excluded.display_name, user_profiles.display_name),
          body_weight_kg = COALESCE(excluded.body_weight_kg, user_profiles.body_weight_kg),
          current_split_id = COALESCE(excluded.current_split_id, user_profiles.current_split_id),
          updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(&update.display_name)
    .bind(update.body_weight_kg)
    .bind(&update.current_split_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}
