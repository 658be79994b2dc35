use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{validate_body, AppResult};
use crate::models::habit::{CreateHabitLogRequest, DailyHabit};
use crate::models::HistoryQuery;
use crate::AppState;

pub async fn create_habit_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateHabitLogRequest>,
) -> AppResult<(StatusCode, Json<DailyHabit>)> {
    validate_body(&body)?;

    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());

    let log = sqlx::query_as::<_, DailyHabit>(
        r#"
        INSERT INTO daily_habits (id, user_id, date, routine_followed, extra_physical_activity, screen_time_hours)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(date)
    .bind(body.routine_followed)
    .bind(body.extra_physical_activity)
    .bind(body.screen_time_hours)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn habit_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<DailyHabit>>> {
    let logs = sqlx::query_as::<_, DailyHabit>(
        r#"
        SELECT * FROM daily_habits
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
