//! Notification API Handlers
//!
//! 管理员看到 admin 频道；员工只看到发给自己的 employee 频道通知。

use axum::extract::{Path, State};
use serde::Serialize;
use shared::models::{Notification, NotificationQuery, UnreadCount};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::notification::{self, FeedScope};
use crate::utils::{AppError, AppResult, Json, Query};

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

fn scope_of(user: &CurrentUser) -> FeedScope {
    if user.is_admin() {
        FeedScope::admin()
    } else {
        FeedScope::employee(user.id)
    }
}

pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let items = notification::find_feed(state.pool(), scope_of(&user), false, query.limit).await?;
    Ok(Json(items))
}

pub async fn unread(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let items = notification::find_feed(state.pool(), scope_of(&user), true, query.limit).await?;
    Ok(Json(items))
}

pub async fn unread_count(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UnreadCount>> {
    let count = notification::count_unread(state.pool(), scope_of(&user)).await?;
    Ok(Json(UnreadCount { count }))
}

/// Mark one notification read; notifications outside the caller's feed are 404
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !notification::mark_read(state.pool(), id, scope_of(&user)).await? {
        return Err(AppError::not_found(format!("Notification {id}")));
    }
    state.notifications.publish_read(id);
    Ok(Json(true))
}

pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<MarkAllReadResponse>> {
    let scope = scope_of(&user);
    let updated = notification::mark_all_read(state.pool(), scope).await?;
    if updated > 0 {
        state.notifications.publish_read_all(scope);
    }
    tracing::debug!(user_id = user.id, updated, "Marked all notifications read");
    Ok(Json(MarkAllReadResponse { updated }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !notification::delete(state.pool(), id).await? {
        return Err(AppError::not_found(format!("Notification {id}")));
    }
    Ok(Json(true))
}
