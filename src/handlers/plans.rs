use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::plan::{CompleteItemRequest, Plan, PlanItem, PlanItemWithTask, PlanWithItems};
use crate::models::task::Task;
use crate::services::planner;
use crate::AppState;

pub async fn current_plan(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<PlanWithItems>> {
    let plan = sqlx::query_as::<_, Plan>(
        "SELECT * FROM plans WHERE user_id = $1 AND is_active = true",
    )
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("No active plan found".into()))?;

    let items = sqlx::query_as::<_, PlanItem>(
        "SELECT * FROM plan_items WHERE plan_id = $1 ORDER BY day_date ASC",
    )
    .bind(plan.id)
    .fetch_all(&state.db)
    .await?;

    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks")
        .fetch_all(&state.db)
        .await?;
    let task_map: HashMap<Uuid, Task> = tasks.into_iter().map(|t| (t.id, t)).collect();

    let mut joined = Vec::with_capacity(items.len());
    for item in items {
        let task = task_map.get(&item.task_id).cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "plan item {} references missing task {}",
                item.id,
                item.task_id
            ))
        })?;
        joined.push(PlanItemWithTask { item, task });
    }

    Ok(Json(PlanWithItems {
        plan,
        items: joined,
    }))
}

pub async fn generate_plan(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<(StatusCode, Json<Plan>)> {
    let plan = planner::generate_for_user(&state, auth_user.id).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// Toggle a single plan item's completion state. The second path segment is
/// the plan-item id; the update is scoped to the plan in the path and to
/// the authenticated owner. Idempotent: re-sending the same value is a
/// no-op update on the same row.
pub async fn complete_item(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((plan_id, item_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CompleteItemRequest>,
) -> AppResult<Json<PlanItem>> {
    let item = sqlx::query_as::<_, PlanItem>(
        r#"
        UPDATE plan_items
        SET is_completed = $3
        FROM plans
        WHERE plan_items.id = $1
          AND plan_items.plan_id = $2
          AND plans.id = plan_items.plan_id
          AND plans.user_id = $4
        RETURNING plan_items.*
        "#,
    )
    .bind(item_id)
    .bind(plan_id)
    .bind(body.is_completed)
    .bind(auth_user.id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(item))
}
