//! Authentication Handlers

use std::time::{Duration, Instant};

use axum::extract::State;
use shared::models::{LoginRequest, LoginResponse, UserInfo, UserRole};

use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;
use crate::db::repository::{admin, employee};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, Json};

/// Minimum login latency, so unknown emails and wrong passwords look alike
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Admin accounts are checked first, then employees.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let started = Instant::now();
    let result = check_credentials(&state, &req).await;

    // Fixed floor to prevent timing attacks
    let floor = Duration::from_millis(AUTH_FIXED_DELAY_MS);
    if let Some(remaining) = floor.checked_sub(started.elapsed()) {
        tokio::time::sleep(remaining).await;
    }

    let user = result?;
    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = user.id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse { token, user }))
}

async fn check_credentials(state: &ServerState, req: &LoginRequest) -> AppResult<UserInfo> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    if let Some(account) = admin::find_by_email(state.pool(), email).await? {
        if !verify_password(&req.password, &account.password_hash) {
            security_log!("WARN", "login_failed", email = email, reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }
        return Ok(UserInfo {
            id: account.id,
            email: account.email,
            name: account.name,
            role: UserRole::Admin,
        });
    }

    let Some(found) = employee::find_by_email(state.pool(), email).await? else {
        security_log!("WARN", "login_failed", email = email, reason = "user_not_found");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &found.password_hash) {
        security_log!("WARN", "login_failed", email = email, reason = "invalid_password");
        return Err(AppError::invalid_credentials());
    }

    // Only reveal the disabled state to someone who knows the password
    if !found.is_active() {
        security_log!("WARN", "login_disabled", user_id = found.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    Ok(UserInfo {
        id: found.id,
        email: found.email,
        name: found.name,
        role: UserRole::Employee,
    })
}

/// Get current user info
///
/// Re-reads the account so renamed or removed users are reflected.
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<UserInfo>> {
    let info = match user.role {
        UserRole::Admin => admin::find_by_id(state.pool(), user.id)
            .await?
            .map(|a| UserInfo {
                id: a.id,
                email: a.email,
                name: a.name,
                role: UserRole::Admin,
            }),
        UserRole::Employee => employee::find_by_id(state.pool(), user.id)
            .await?
            .filter(|e| e.is_active())
            .map(|e| UserInfo {
                id: e.id,
                email: e.email,
                name: e.name,
                role: UserRole::Employee,
            }),
    };

    info.map(Json).ok_or_else(AppError::unauthorized)
}
