//! Notification API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/notifications | GET | 通知列表 (新的在前) |
//! | /api/notifications/unread | GET | 未读列表 |
//! | /api/notifications/unread/count | GET | 未读数量 |
//! | /api/notifications/{id}/read | PUT | 标记已读 |
//! | /api/notifications/read-all | PUT | 全部标记已读 |
//! | /api/notifications/{id} | DELETE | 删除 (管理员) |
//! | /api/notifications/ws | GET | WebSocket 实时推送 |

mod handler;
mod ws;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/unread", get(handler::unread))
        .route("/unread/count", get(handler::unread_count))
        .route("/read-all", put(handler::mark_all_read))
        .route("/{id}/read", put(handler::mark_read))
        .route("/ws", get(ws::subscribe));

    let manage_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
