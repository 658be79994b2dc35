use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::mood::MoodLog;
use crate::models::plan::Plan;
use crate::models::profile::UserProfile;
use crate::models::task::Task;
use crate::services::claude;
use crate::AppState;

/// The week is fixed: 7 days, anchored to "today" at offset 0.
const PLAN_DAYS: i64 = 7;

/// What the planning model must return: one entry per day, each naming the
/// catalog tasks scheduled for that offset.
#[derive(Debug, Deserialize)]
pub struct PlanSelection {
    pub days: Vec<DaySelection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySelection {
    pub day_offset: i64,
    pub task_ids: Vec<Uuid>,
}

/// Mood inputs to the planner. When the user has never logged a mood we
/// plan from a neutral baseline instead of refusing.
#[derive(Debug)]
pub struct MoodSnapshot {
    pub mood_score: i32,
    pub mood_label: String,
    pub stress_score: i32,
    pub sleep_score: i32,
    pub energy_score: i32,
    pub notes: String,
}

impl MoodSnapshot {
    pub fn neutral() -> Self {
        Self {
            mood_score: 3,
            mood_label: "Neutral".into(),
            stress_score: 3,
            sleep_score: 3,
            energy_score: 3,
            notes: String::new(),
        }
    }
}

impl From<MoodLog> for MoodSnapshot {
    fn from(log: MoodLog) -> Self {
        Self {
            mood_score: log.mood_score,
            mood_label: log.mood_label.unwrap_or_default(),
            stress_score: log.stress_score.unwrap_or(3),
            sleep_score: log.sleep_score.unwrap_or(3),
            energy_score: log.energy_score.unwrap_or(3),
            notes: log.notes.unwrap_or_default(),
        }
    }
}

/// Generate and persist a fresh 7-day plan for the user.
///
/// Fails with a 400 validation error when the user has no profile, and with
/// a 500 planning error when the model call fails or returns an unusable
/// structure. On success the previous active plan (if any) has been flipped
/// to inactive in the same transaction that inserted the new one.
pub async fn generate_for_user(state: &AppState, user_id: Uuid) -> AppResult<Plan> {
    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT * FROM user_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Validation("Complete profile first".into()))?;

    let mood = sqlx::query_as::<_, MoodLog>(
        r#"
        SELECT * FROM mood_logs
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .map(MoodSnapshot::from)
    .unwrap_or_else(MoodSnapshot::neutral);

    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at ASC")
        .fetch_all(&state.db)
        .await?;

    if tasks.is_empty() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "task catalog is empty; seeding did not run"
        )));
    }

    let prompt = build_prompt(&profile, &mood, &tasks);

    let raw = claude::complete(&state.config, 1024, &prompt)
        .await
        .map_err(AppError::Planning)?;

    let selection: PlanSelection = serde_json::from_str(&raw)
        .map_err(|e| AppError::Planning(anyhow::anyhow!("unparsable planner output: {}", e)))?;

    let catalog_ids: HashSet<Uuid> = tasks.iter().map(|t| t.id).collect();
    let selection = validate_selection(selection, &catalog_ids).map_err(AppError::Planning)?;

    let start_date = Utc::now().date_naive();
    let items = expand_items(start_date, &selection);

    let plan = persist_plan(state, user_id, start_date, items).await?;

    tracing::info!(
        user_id = %user_id,
        plan_id = %plan.id,
        start_date = %plan.start_date,
        "Generated weekly plan"
    );

    Ok(plan)
}

fn build_prompt(profile: &UserProfile, mood: &MoodSnapshot, tasks: &[Task]) -> String {
    let task_summaries: Vec<serde_json::Value> = tasks
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "title": t.title,
                "category": t.category,
                "duration": t.duration,
            })
        })
        .collect();

    format!(
        r#"User Profile:
- Occupation: {occupation}
- Age Group: {age_group}
- Sleep: {sleep_time} - {wake_time}
- Habits: Break freq: {break_frequency}, Activity: {physical_activity}
- Music: {music} ({music_moods})
- Games: {games} ({game_types})

Current State:
- Mood: {mood_score}/5 ({mood_label})
- Stress: {stress_score}/5
- Sleep: {sleep_score}/5
- Energy: {energy_score}/5
- Notes: {notes}

Available Tasks (JSON):
{tasks}

Generate a 7-day plan (Day 1 to 7). For each day, select 3 tasks from the available list that best suit the user's mood and profile.
Return ONLY valid JSON in this format:
{{
  "days": [
    {{
      "dayOffset": 0,
      "taskIds": ["<task id>", "<task id>", "<task id>"]
    }}
  ]
}}
with exactly 7 entries, dayOffset 0 through 6."#,
        occupation = profile.occupation.as_deref().unwrap_or("unknown"),
        age_group = profile.age_group.as_deref().unwrap_or("unknown"),
        sleep_time = profile.sleep_time.as_deref().unwrap_or("?"),
        wake_time = profile.wake_time.as_deref().unwrap_or("?"),
        break_frequency = profile.break_frequency.as_deref().unwrap_or("unknown"),
        physical_activity = profile.physical_activity.as_deref().unwrap_or("unknown"),
        music = if profile.music_app.is_some() { "Yes" } else { "No" },
        music_moods = profile
            .music_moods
            .as_ref()
            .map(|m| m.join(", "))
            .unwrap_or_default(),
        games = if profile.plays_games.unwrap_or(false) { "Yes" } else { "No" },
        game_types = profile
            .game_types
            .as_ref()
            .map(|g| g.join(", "))
            .unwrap_or_default(),
        mood_score = mood.mood_score,
        mood_label = mood.mood_label,
        stress_score = mood.stress_score,
        sleep_score = mood.sleep_score,
        energy_score = mood.energy_score,
        notes = mood.notes,
        tasks = serde_json::Value::Array(task_summaries),
    )
}

/// Reject structures the builder cannot expand. Task ids outside the
/// catalog are dropped (the model occasionally invents one); a day left
/// with nothing to schedule makes the whole selection unusable.
fn validate_selection(
    mut selection: PlanSelection,
    catalog_ids: &HashSet<Uuid>,
) -> anyhow::Result<PlanSelection> {
    if selection.days.len() != PLAN_DAYS as usize {
        anyhow::bail!(
            "expected {} day entries, got {}",
            PLAN_DAYS,
            selection.days.len()
        );
    }

    let mut seen_offsets = [false; PLAN_DAYS as usize];
    for day in &mut selection.days {
        if !(0..PLAN_DAYS).contains(&day.day_offset) {
            anyhow::bail!("day offset {} outside 0..{}", day.day_offset, PLAN_DAYS - 1);
        }
        if seen_offsets[day.day_offset as usize] {
            anyhow::bail!("duplicate day offset {}", day.day_offset);
        }
        seen_offsets[day.day_offset as usize] = true;

        let before = day.task_ids.len();
        day.task_ids.retain(|id| catalog_ids.contains(id));
        if day.task_ids.len() < before {
            tracing::warn!(
                day_offset = day.day_offset,
                dropped = before - day.task_ids.len(),
                "Planner selected task ids outside the catalog"
            );
        }
        if day.task_ids.is_empty() {
            anyhow::bail!("day offset {} has no usable task ids", day.day_offset);
        }
    }

    selection.days.sort_by_key(|d| d.day_offset);
    Ok(selection)
}

/// Expand the planner's day/task structure into dated (day_date, task_id)
/// rows anchored at `start_date`.
fn expand_items(start_date: NaiveDate, selection: &PlanSelection) -> Vec<(NaiveDate, Uuid)> {
    let mut items = Vec::new();
    for day in &selection.days {
        let day_date = start_date + Duration::days(day.day_offset);
        for task_id in &day.task_ids {
            items.push((day_date, *task_id));
        }
    }
    items
}

/// Deactivate any prior active plan and insert the new plan with its items,
/// all inside one transaction. A reader never observes an intermediate
/// active-plan count.
async fn persist_plan(
    state: &AppState,
    user_id: Uuid,
    start_date: NaiveDate,
    items: Vec<(NaiveDate, Uuid)>,
) -> AppResult<Plan> {
    let end_date = start_date + Duration::days(PLAN_DAYS - 1);

    let mut tx = state.db.begin().await?;

    sqlx::query("UPDATE plans SET is_active = false WHERE user_id = $1 AND is_active = true")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let plan = sqlx::query_as::<_, Plan>(
        r#"
        INSERT INTO plans (id, user_id, start_date, end_date, is_active)
        VALUES ($1, $2, $3, $4, true)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(&mut *tx)
    .await?;

    for (day_date, task_id) in &items {
        sqlx::query(
            r#"
            INSERT INTO plan_items (id, plan_id, day_date, task_id, is_completed)
            VALUES ($1, $2, $3, $4, false)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plan.id)
        .bind(day_date)
        .bind(task_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> (Vec<Uuid>, HashSet<Uuid>) {
        let ids: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        let set = ids.iter().copied().collect();
        (ids, set)
    }

    fn full_week(ids: &[Uuid]) -> PlanSelection {
        PlanSelection {
            days: (0..7)
                .map(|offset| DaySelection {
                    day_offset: offset,
                    task_ids: vec![ids[0], ids[1], ids[2]],
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_well_formed_week() {
        let (ids, set) = catalog(3);
        let selection = validate_selection(full_week(&ids), &set).unwrap();
        assert_eq!(selection.days.len(), 7);
        for (i, day) in selection.days.iter().enumerate() {
            assert_eq!(day.day_offset, i as i64);
            assert_eq!(day.task_ids, vec![ids[0], ids[1], ids[2]]);
        }
    }

    #[test]
    fn rejects_wrong_day_count() {
        let (ids, set) = catalog(3);
        let mut selection = full_week(&ids);
        selection.days.pop();
        assert!(validate_selection(selection, &set).is_err());

        let mut selection = full_week(&ids);
        selection.days.push(DaySelection {
            day_offset: 6,
            task_ids: vec![ids[0]],
        });
        assert!(validate_selection(selection, &set).is_err());
    }

    #[test]
    fn rejects_offset_out_of_range() {
        let (ids, set) = catalog(3);
        let mut selection = full_week(&ids);
        selection.days[3].day_offset = 7;
        assert!(validate_selection(selection, &set).is_err());
    }

    #[test]
    fn rejects_duplicate_offsets() {
        let (ids, set) = catalog(3);
        let mut selection = full_week(&ids);
        selection.days[6].day_offset = 0;
        assert!(validate_selection(selection, &set).is_err());
    }

    #[test]
    fn drops_unknown_task_ids_but_keeps_the_rest() {
        let (ids, set) = catalog(3);
        let mut selection = full_week(&ids);
        selection.days[2].task_ids = vec![ids[0], Uuid::new_v4(), ids[2]];

        let validated = validate_selection(selection, &set).unwrap();
        assert_eq!(validated.days[2].task_ids, vec![ids[0], ids[2]]);
    }

    #[test]
    fn rejects_day_with_no_usable_ids() {
        let (ids, set) = catalog(3);
        let mut selection = full_week(&ids);
        selection.days[4].task_ids = vec![Uuid::new_v4()];
        assert!(validate_selection(selection, &set).is_err());
    }

    #[test]
    fn reorders_days_by_offset() {
        let (ids, set) = catalog(3);
        let mut selection = full_week(&ids);
        selection.days.reverse();
        let validated = validate_selection(selection, &set).unwrap();
        let offsets: Vec<i64> = validated.days.iter().map(|d| d.day_offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn expansion_yields_one_item_per_date_task_tuple() {
        let (ids, set) = catalog(3);
        let selection = validate_selection(full_week(&ids), &set).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();

        let items = expand_items(start, &selection);
        assert_eq!(items.len(), 21); // 3 tasks/day x 7 days

        let dates: HashSet<NaiveDate> = items.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates.len(), 7);
        assert!(dates.contains(&start));
        assert!(dates.contains(&(start + Duration::days(6))));
        assert!(!dates.contains(&(start + Duration::days(7))));
    }

    #[test]
    fn selection_parses_planner_wire_format() {
        let id = Uuid::new_v4();
        let raw = format!(
            r#"{{"days":[{{"dayOffset":0,"taskIds":["{id}"]}}]}}"#
        );
        let selection: PlanSelection = serde_json::from_str(&raw).unwrap();
        assert_eq!(selection.days.len(), 1);
        assert_eq!(selection.days[0].day_offset, 0);
        assert_eq!(selection.days[0].task_ids, vec![id]);
    }

    #[test]
    fn neutral_snapshot_scores_three_on_every_axis() {
        let mood = MoodSnapshot::neutral();
        assert_eq!(mood.mood_score, 3);
        assert_eq!(mood.stress_score, 3);
        assert_eq!(mood.sleep_score, 3);
        assert_eq!(mood.energy_score, 3);
    }

    #[test]
    fn prompt_includes_catalog_ids_and_mood() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            age_group: Some("25-34".into()),
            occupation: Some("Software developer".into()),
            sleep_time: Some("23:00".into()),
            wake_time: Some("07:00".into()),
            break_frequency: Some("hourly".into()),
            caffeine_intake: Some("2 cups".into()),
            physical_activity: Some("light".into()),
            music_app: Some("spotify".into()),
            music_moods: Some(vec!["calm".into(), "focus".into()]),
            plays_games: Some(true),
            game_platforms: Some(vec!["pc".into()]),
            game_types: Some(vec!["puzzle".into()]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let task = Task {
            id: Uuid::new_v4(),
            title: "5-min Meditation".into(),
            description: None,
            category: crate::models::task::TaskCategory::Mental,
            duration: Some(5),
            difficulty: Some("easy".into()),
            time_hint: None,
            created_at: Utc::now(),
        };
        let mood = MoodSnapshot {
            mood_score: 2,
            mood_label: "Low".into(),
            stress_score: 4,
            sleep_score: 3,
            energy_score: 2,
            notes: "rough week".into(),
        };

        let prompt = build_prompt(&profile, &mood, &[task.clone()]);
        assert!(prompt.contains(&task.id.to_string()));
        assert!(prompt.contains("Mood: 2/5 (Low)"));
        assert!(prompt.contains("Stress: 4/5"));
        assert!(prompt.contains("7-day plan"));
    }
}
