use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::task::Task;
use crate::AppState;

pub async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<Task>>> {
    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at ASC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(tasks))
}
