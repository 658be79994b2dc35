use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifestyle questionnaire answers, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age_group: Option<String>,
    pub occupation: Option<String>,
    pub sleep_time: Option<String>,
    pub wake_time: Option<String>,
    pub break_frequency: Option<String>,
    pub caffeine_intake: Option<String>,
    pub physical_activity: Option<String>,
    pub music_app: Option<String>,
    pub music_moods: Option<Vec<String>>,
    pub plays_games: Option<bool>,
    pub game_platforms: Option<Vec<String>>,
    pub game_types: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/profile — partial upsert, all fields optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    #[validate(length(max = 50, message = "Age group too long"))]
    pub age_group: Option<String>,

    #[validate(length(max = 200, message = "Occupation too long"))]
    pub occupation: Option<String>,

    pub sleep_time: Option<String>,
    pub wake_time: Option<String>,
    pub break_frequency: Option<String>,
    pub caffeine_intake: Option<String>,
    pub physical_activity: Option<String>,
    pub music_app: Option<String>,
    pub music_moods: Option<Vec<String>>,
    pub plays_games: Option<bool>,
    pub game_platforms: Option<Vec<String>>,
    pub game_types: Option<Vec<String>>,
}
