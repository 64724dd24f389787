//! Employee API Handlers

use axum::extract::{Path, State};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};

use crate::api::convert::employee_error;
use crate::auth::{CurrentUser, ensure_can_access, hash_password};
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::utils::validation::{self, MAX_PASSWORD_LEN};
use crate::utils::{AppError, AppResult, ErrorCode, Json};

/// Admins get everyone; an employee gets a list containing only themselves
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    if user.is_admin() {
        let employees = employee::find_all(state.pool()).await?;
        return Ok(Json(employees));
    }

    let me = employee::find_by_id(state.pool(), user.id).await?;
    Ok(Json(me.into_iter().collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    ensure_can_access(&user, id)?;
    let found = employee::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    Ok(Json(found))
}

/// Create a new employee
///
/// Without an explicit password the configured default is used.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    let password = match payload.password.as_deref() {
        Some(p) => validation::required_text(Some(p), "password", MAX_PASSWORD_LEN)
            .map_err(AppError::validation)?,
        None => state.config.default_employee_password.clone(),
    };
    let hash = hash_password(&password)?;

    let created = employee::create(state.pool(), payload, &hash)
        .await
        .map_err(employee_error)?;
    tracing::info!(employee_id = created.id, email = %created.email, "Employee created");
    Ok(Json(created))
}

/// Partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let hash = match payload.password.as_deref() {
        Some(p) => {
            let password = validation::required_text(Some(p), "password", MAX_PASSWORD_LEN)
                .map_err(AppError::validation)?;
            Some(hash_password(&password)?)
        }
        None => None,
    };

    let updated = employee::update(state.pool(), id, payload, hash.as_deref())
        .await
        .map_err(employee_error)?;
    tracing::info!(employee_id = id, "Employee updated");
    Ok(Json(updated))
}

/// Delete an employee and, via cascade, their leaves, tasks and records
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !employee::delete(state.pool(), id).await? {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    tracing::info!(employee_id = id, "Employee deleted");
    Ok(Json(true))
}
