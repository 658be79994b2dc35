use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Free-text journal entry with a derived sentiment score (1-10).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeelingsNote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub sentiment_score: Option<i32>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// POST /api/notes
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[validate(length(max = 200, message = "Title must be under 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Content is required"))]
    pub content: String,
}
