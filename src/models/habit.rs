use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Daily routine check-in, separate from mood: did the user keep their
/// routine, move extra, and how much screen time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyHabit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub routine_followed: Option<bool>,
    pub extra_physical_activity: Option<bool>,
    pub screen_time_hours: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// POST /api/habits
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitLogRequest {
    /// Defaults to today when omitted.
    pub date: Option<NaiveDate>,

    pub routine_followed: Option<bool>,
    pub extra_physical_activity: Option<bool>,

    #[validate(range(min = 0, max = 24, message = "Screen time must be between 0 and 24 hours"))]
    pub screen_time_hours: Option<i32>,
}
