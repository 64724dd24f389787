//! Leave API Module
//!
//! 审批权限在 [`crate::leave::decide`] 内检查，员工调用返回 403。
//! 统计报表 `/analytics` 仅管理员可见。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leaves", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::decide));

    let manage_routes = Router::new()
        .route("/analytics", get(handler::analytics))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
