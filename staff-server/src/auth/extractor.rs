//! JWT Extractor
//!
//! `CurrentUser` as a handler argument: reuses the user injected by
//! [`require_auth`](super::require_auth), or validates the header itself
//! (WebSocket upgrades and routers mounted without the middleware).

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::auth::middleware::authenticate;
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let user = authenticate(state.get_jwt_service(), auth_header, &parts.uri)?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
