//! Dashboard API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/stats", get(handler::stats));

    let manage_routes = Router::new()
        .route("/salary", get(handler::salary))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
