//! CSV Export API Module (管理员)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/export", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/employees.csv", get(handler::employees))
        .route("/leaves.csv", get(handler::leaves))
        .route("/attendance.csv", get(handler::attendance))
        .route("/payroll.csv", get(handler::payroll))
        .route("/leave-analytics.csv", get(handler::leave_analytics))
        .layer(middleware::from_fn(require_admin))
}
