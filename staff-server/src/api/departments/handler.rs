//! Department API Handlers

use axum::extract::{Path, State};
use shared::models::{Department, DepartmentCreate, DepartmentUpdate};

use crate::api::convert::department_error;
use crate::core::ServerState;
use crate::db::repository::department;
use crate::utils::{AppError, AppResult, ErrorCode, Json};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Department>>> {
    let departments = department::find_all(state.pool()).await?;
    Ok(Json(departments))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Department>> {
    let found = department::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;
    Ok(Json(found))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DepartmentCreate>,
) -> AppResult<Json<Department>> {
    let created = department::create(state.pool(), payload)
        .await
        .map_err(department_error)?;
    tracing::info!(department_id = created.id, name = %created.name, "Department created");
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentUpdate>,
) -> AppResult<Json<Department>> {
    let updated = department::update(state.pool(), id, payload)
        .await
        .map_err(department_error)?;
    Ok(Json(updated))
}

/// Employees keep their department name after the department is removed
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !department::delete(state.pool(), id).await? {
        return Err(AppError::new(ErrorCode::DepartmentNotFound));
    }
    tracing::info!(department_id = id, "Department deleted");
    Ok(Json(true))
}
