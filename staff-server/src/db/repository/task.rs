//! Task Repository

use super::{RepoError, RepoResult};
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_NOTE_LEN};
use shared::models::{Task, TaskCreate, TaskStats, TaskStatus, TaskUpdate};
use sqlx::SqlitePool;

const TASK_SELECT: &str = "SELECT t.id, t.title, t.description, t.assigned_to, e.name AS employee_name, t.created_by, t.status, t.priority, t.due_date, t.completed_at, t.created_at, t.updated_at FROM task t LEFT JOIN employee e ON e.id = t.assigned_to";

fn validate_due_date(value: Option<&str>) -> RepoResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            validation::date(v, "due_date").map_err(RepoError::Validation)?;
            Ok(Some(v.to_string()))
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Task>> {
    let sql = format!("{TASK_SELECT} WHERE t.id = ?");
    let task = sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(task)
}

/// Tasks newest first, optionally for one assignee
pub async fn find_all(pool: &SqlitePool, assigned_to: Option<i64>) -> RepoResult<Vec<Task>> {
    let sql = format!(
        "{TASK_SELECT} WHERE (?1 IS NULL OR t.assigned_to = ?1) ORDER BY t.created_at DESC, t.id DESC"
    );
    let tasks = sqlx::query_as::<_, Task>(&sql)
        .bind(assigned_to)
        .fetch_all(pool)
        .await?;
    Ok(tasks)
}

/// Create a task; the assignee's existence is checked by the caller
pub async fn create(pool: &SqlitePool, data: TaskCreate, created_by: i64) -> RepoResult<Task> {
    let title = validation::required_text(data.title.as_deref(), "title", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let description =
        validation::optional_text(data.description.as_deref(), "description", MAX_NOTE_LEN)
            .map_err(RepoError::Validation)?
            .unwrap_or_default();
    let assigned_to = data
        .assigned_to
        .ok_or_else(|| RepoError::Validation("assigned_to is required".into()))?;
    let due_date = validate_due_date(data.due_date.as_deref())?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO task (id, title, description, assigned_to, created_by, status, priority, due_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(&title)
    .bind(&description)
    .bind(assigned_to)
    .bind(created_by)
    .bind(data.priority.unwrap_or_default())
    .bind(&due_date)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create task".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TaskUpdate) -> RepoResult<Task> {
    let title = validation::optional_text(data.title.as_deref(), "title", MAX_NAME_LEN)
        .map_err(RepoError::Validation)?;
    let description = match data.description.as_deref() {
        Some(d) => Some(
            validation::optional_text(Some(d), "description", MAX_NOTE_LEN)
                .map_err(RepoError::Validation)?
                .unwrap_or_default(),
        ),
        None => None,
    };
    let due_date = validate_due_date(data.due_date.as_deref())?;

    let rows = sqlx::query(
        "UPDATE task SET title = COALESCE(?1, title), description = COALESCE(?2, description), priority = COALESCE(?3, priority), due_date = COALESCE(?4, due_date), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&title)
    .bind(&description)
    .bind(data.priority)
    .bind(&due_date)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Task {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Task {id} not found")))
}

/// Change status when it differs from the stored one
///
/// Returns `false` when the task already had `status` (no-op).
/// `completed` stamps `completed_at`; `pending` clears it.
pub async fn set_status(pool: &SqlitePool, id: i64, status: TaskStatus) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE task SET status = ?1, completed_at = CASE WHEN ?1 = 'completed' THEN ?2 ELSE NULL END, updated_at = ?2 WHERE id = ?3 AND status != ?1",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM task WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Statistics, optionally scoped to one assignee
pub async fn stats(pool: &SqlitePool, assigned_to: Option<i64>) -> RepoResult<TaskStats> {
    let (total, completed): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(status = 'completed'), 0) FROM task WHERE (?1 IS NULL OR assigned_to = ?1)",
    )
    .bind(assigned_to)
    .fetch_one(pool)
    .await?;
    Ok(TaskStats::from_counts(total, completed))
}
