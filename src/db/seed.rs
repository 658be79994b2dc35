use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::task::TaskCategory;

/// Seed the activity catalog on first boot. Later boots see a populated
/// table and skip.
pub async fn seed_tasks(db: &PgPool) -> AppResult<()> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
        .fetch_one(db)
        .await?;

    if existing > 0 {
        tracing::debug!(count = existing, "Task catalog already seeded");
        return Ok(());
    }

    let starter: &[(&str, &str, TaskCategory, i32, &str)] = &[
        (
            "5-min Meditation",
            "Sit quietly and focus on your breath.",
            TaskCategory::Mental,
            5,
            "easy",
        ),
        (
            "Gratitude Journaling",
            "Write down 3 things you are grateful for.",
            TaskCategory::Mental,
            10,
            "easy",
        ),
        (
            "Light Stretching",
            "Stretch your arms, legs, and back.",
            TaskCategory::Physical,
            10,
            "easy",
        ),
        (
            "20-min Walk",
            "Go for a brisk walk outside.",
            TaskCategory::Physical,
            20,
            "medium",
        ),
        (
            "Listen to 'Calm' Playlist",
            "Relax with some soothing music.",
            TaskCategory::Music,
            15,
            "easy",
        ),
        (
            "High Energy Dance",
            "Dance to your favorite upbeat song.",
            TaskCategory::Music,
            10,
            "medium",
        ),
        (
            "Puzzle Game Session",
            "Play a relaxing puzzle game.",
            TaskCategory::Game,
            15,
            "easy",
        ),
        (
            "Deep Breathing",
            "Box breathing technique.",
            TaskCategory::Mental,
            5,
            "easy",
        ),
    ];

    for (title, description, category, duration, difficulty) in starter {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, category, duration, difficulty)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(duration)
        .bind(difficulty)
        .execute(db)
        .await?;
    }

    tracing::info!(count = starter.len(), "Seeded task catalog");
    Ok(())
}
