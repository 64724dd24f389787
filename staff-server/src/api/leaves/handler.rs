//! Leave API Handlers

use axum::extract::{Path, State};
use shared::models::{
    LeaveAnalytics, LeaveAnalyticsQuery, LeaveCreate, LeaveDecision, LeaveQuery, LeaveRequest,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::leave;
use crate::utils::{AppResult, Json, Query};

pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<LeaveQuery>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let leaves = leave::list(state.pool(), &user, query).await?;
    Ok(Json(leaves))
}

pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveCreate>,
) -> AppResult<Json<LeaveRequest>> {
    let created = leave::submit(state.pool(), &state.notifications, &user, payload).await?;
    Ok(Json(created))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<LeaveRequest>> {
    let found = leave::get(state.pool(), &user, id).await?;
    Ok(Json(found))
}

pub async fn decide(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<LeaveDecision>,
) -> AppResult<Json<LeaveRequest>> {
    let decided = leave::decide(state.pool(), &state.notifications, &user, id, payload).await?;
    Ok(Json(decided))
}

/// Per-employee leave totals for a month or a year
pub async fn analytics(
    State(state): State<ServerState>,
    Query(query): Query<LeaveAnalyticsQuery>,
) -> AppResult<Json<LeaveAnalytics>> {
    let report = leave::analytics::report(state.pool(), query).await?;
    Ok(Json(report))
}
