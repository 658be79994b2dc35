use axum::{extract::State, Extension, Json};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{validate_body, AppError, AppResult};
use crate::models::profile::{UpsertProfileRequest, UserProfile};
use crate::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT * FROM user_profiles WHERE user_id = $1",
    )
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Profile not found".into()))?;

    Ok(Json(profile))
}

/// Create or update the lifestyle profile. Fields absent from the request
/// keep their stored value.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    validate_body(&body)?;

    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (
            id, user_id, age_group, occupation, sleep_time, wake_time,
            break_frequency, caffeine_intake, physical_activity, music_app,
            music_moods, plays_games, game_platforms, game_types
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (user_id) DO UPDATE SET
            age_group = COALESCE($3, user_profiles.age_group),
            occupation = COALESCE($4, user_profiles.occupation),
            sleep_time = COALESCE($5, user_profiles.sleep_time),
            wake_time = COALESCE($6, user_profiles.wake_time),
            break_frequency = COALESCE($7, user_profiles.break_frequency),
            caffeine_intake = COALESCE($8, user_profiles.caffeine_intake),
            physical_activity = COALESCE($9, user_profiles.physical_activity),
            music_app = COALESCE($10, user_profiles.music_app),
            music_moods = COALESCE($11, user_profiles.music_moods),
            plays_games = COALESCE($12, user_profiles.plays_games),
            game_platforms = COALESCE($13, user_profiles.game_platforms),
            game_types = COALESCE($14, user_profiles.game_types),
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.age_group)
    .bind(&body.occupation)
    .bind(&body.sleep_time)
    .bind(&body.wake_time)
    .bind(&body.break_frequency)
    .bind(&body.caffeine_intake)
    .bind(&body.physical_activity)
    .bind(&body.music_app)
    .bind(&body.music_moods)
    .bind(body.plays_games)
    .bind(&body.game_platforms)
    .bind(&body.game_types)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(profile))
}
