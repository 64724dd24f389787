//! Authentication Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::login_rate_limit;
use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login: public, rate limited per client IP
/// - /api/auth/me: auth middleware handled at Router level
pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route(
            "/api/auth/login",
            post(handler::login).layer(middleware::from_fn_with_state(
                state.clone(),
                login_rate_limit,
            )),
        )
        .route("/api/auth/me", get(handler::me))
}
