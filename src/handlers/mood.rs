use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{validate_body, AppResult};
use crate::models::mood::{CreateMoodLogRequest, MoodLog};
use crate::models::HistoryQuery;
use crate::AppState;

pub async fn create_mood_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateMoodLogRequest>,
) -> AppResult<(StatusCode, Json<MoodLog>)> {
    validate_body(&body)?;

    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());

    let log = sqlx::query_as::<_, MoodLog>(
        r#"
        INSERT INTO mood_logs (id, user_id, date, mood_score, mood_label, stress_score, sleep_score, energy_score, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(date)
    .bind(body.mood_score)
    .bind(&body.mood_label)
    .bind(body.stress_score)
    .bind(body.sleep_score)
    .bind(body.energy_score)
    .bind(&body.notes)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn mood_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<MoodLog>>> {
    let logs = sqlx::query_as::<_, MoodLog>(
        r#"
        SELECT * FROM mood_logs
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(auth_user.id)
    .bind(query.limit_or_default())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(logs))
}
