use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::task::Task;

/// A 7-day bundle of scheduled activities. Plans are never deleted; a new
/// generation flips the previous plan to inactive in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One activity scheduled on one date within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub day_date: NaiveDate,
    pub task_id: Uuid,
    pub is_completed: bool,
}

/// Plan item joined with its catalog task, for the dashboard view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItemWithTask {
    #[serde(flatten)]
    pub item: PlanItem,
    pub task: Task,
}

/// GET /api/plans/current response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithItems {
    #[serde(flatten)]
    pub plan: Plan,
    pub items: Vec<PlanItemWithTask>,
}

/// PATCH /api/plans/:id/tasks/:taskId/complete body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteItemRequest {
    pub is_completed: bool,
}
