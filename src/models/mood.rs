use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One check-in. Append-only; history is read latest-first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mood_score: i32,
    pub mood_label: Option<String>,
    pub stress_score: Option<i32>,
    pub sleep_score: Option<i32>,
    pub energy_score: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// POST /api/mood
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodLogRequest {
    /// Defaults to today when omitted.
    pub date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood_score: i32,

    #[validate(length(max = 50, message = "Mood label too long"))]
    pub mood_label: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Stress must be between 1 and 5"))]
    pub stress_score: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Sleep must be between 1 and 5"))]
    pub sleep_score: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Energy must be between 1 and 5"))]
    pub energy_score: Option<i32>,

    #[validate(length(max = 5000, message = "Notes must be under 5000 characters"))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{validate_body, AppError};

    fn base_request() -> CreateMoodLogRequest {
        CreateMoodLogRequest {
            date: None,
            mood_score: 3,
            mood_label: None,
            stress_score: None,
            sleep_score: None,
            energy_score: None,
            notes: None,
        }
    }

    #[test]
    fn mood_score_out_of_range_rejected() {
        let mut req = base_request();
        req.mood_score = 6;
        let err = validate_body(&req).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Mood must be between 1 and 5"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn optional_axes_validated_when_present() {
        let mut req = base_request();
        req.energy_score = Some(0);
        assert!(validate_body(&req).is_err());

        req.energy_score = Some(5);
        assert!(validate_body(&req).is_ok());
    }
}
