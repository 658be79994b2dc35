use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{validate_body, AppResult};
use crate::models::note::{CreateNoteRequest, FeelingsNote};
use crate::services::sentiment;
use crate::AppState;

pub async fn list_notes(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<FeelingsNote>>> {
    let notes = sqlx::query_as::<_, FeelingsNote>(
        r#"
        SELECT * FROM feelings_notes
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateNoteRequest>,
) -> AppResult<(StatusCode, Json<FeelingsNote>)> {
    validate_body(&body)?;

    // Scoring degrades to neutral internally; a note is saved either way.
    let sentiment_score = sentiment::analyze(&state.config, &body.content).await;

    let note = sqlx::query_as::<_, FeelingsNote>(
        r#"
        INSERT INTO feelings_notes (id, user_id, title, content, sentiment_score)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.title)
    .bind(&body.content)
    .bind(sentiment_score)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}
