//! Task API Handlers

use axum::extract::{Path, State};
use shared::models::{
    Task, TaskCreate, TaskQuery, TaskStats, TaskStatus, TaskStatusUpdate, TaskUpdate,
};

use crate::api::convert::task_error;
use crate::auth::{CurrentUser, ensure_can_access};
use crate::core::ServerState;
use crate::db::repository::{employee, task};
use crate::notify::events;
use crate::utils::{AppError, AppResult, ErrorCode, Json, Query};

/// Newest first; employees only see their own assignments
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let assigned_to = if user.is_admin() {
        query.assigned_to
    } else {
        Some(user.id)
    };
    let tasks = task::find_all(state.pool(), assigned_to).await?;
    Ok(Json(tasks))
}

pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<TaskStats>> {
    let assigned_to = if user.is_admin() {
        query.assigned_to
    } else {
        Some(user.id)
    };
    let stats = task::stats(state.pool(), assigned_to).await?;
    Ok(Json(stats))
}

/// Assign a new task (admin)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TaskCreate>,
) -> AppResult<Json<Task>> {
    let assignee = payload.assigned_to.ok_or_else(|| AppError::required("assigned_to"))?;
    if employee::find_by_id(state.pool(), assignee).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    let created = task::create(state.pool(), payload, user.id)
        .await
        .map_err(task_error)?;
    tracing::info!(task_id = created.id, assigned_to = assignee, "Task assigned");
    state
        .notifications
        .emit(events::task_assigned(&created))
        .await;
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskUpdate>,
) -> AppResult<Json<Task>> {
    let updated = task::update(state.pool(), id, payload)
        .await
        .map_err(task_error)?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !task::delete(state.pool(), id).await? {
        return Err(AppError::new(ErrorCode::TaskNotFound));
    }
    tracing::info!(task_id = id, "Task deleted");
    Ok(Json(true))
}

/// Change status (assignee or admin)
///
/// Re-sending the current status changes nothing and notifies nobody.
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TaskStatusUpdate>,
) -> AppResult<Json<Task>> {
    let existing = task::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TaskNotFound))?;
    ensure_can_access(&user, existing.assigned_to)?;

    if !task::set_status(state.pool(), id, payload.status).await? {
        return Ok(Json(existing));
    }

    let updated = task::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TaskNotFound))?;
    tracing::info!(task_id = id, status = ?updated.status, by = user.id, "Task status changed");

    if updated.status == TaskStatus::Completed {
        state
            .notifications
            .emit(events::task_completed(&updated))
            .await;
    }
    Ok(Json(updated))
}
