//! Office Location API Handlers

use axum::extract::{Path, State};
use shared::models::{OfficeLocation, OfficeLocationCreate, OfficeLocationUpdate};

use crate::api::convert::office_location_error;
use crate::core::ServerState;
use crate::db::repository::office_location;
use crate::utils::{AppError, AppResult, ErrorCode, Json};

/// Zones in geofence evaluation order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OfficeLocation>>> {
    let zones = office_location::find_all(state.pool()).await?;
    Ok(Json(zones))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OfficeLocation>> {
    let zone = office_location::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OfficeLocationNotFound))?;
    Ok(Json(zone))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OfficeLocationCreate>,
) -> AppResult<Json<OfficeLocation>> {
    let zone = office_location::create(state.pool(), payload)
        .await
        .map_err(office_location_error)?;
    tracing::info!(
        office_id = zone.id,
        name = %zone.name,
        radius = zone.radius,
        "Office location created"
    );
    Ok(Json(zone))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OfficeLocationUpdate>,
) -> AppResult<Json<OfficeLocation>> {
    let zone = office_location::update(state.pool(), id, payload)
        .await
        .map_err(office_location_error)?;
    Ok(Json(zone))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !office_location::delete(state.pool(), id).await? {
        return Err(AppError::new(ErrorCode::OfficeLocationNotFound));
    }
    tracing::info!(office_id = id, "Office location deleted");
    Ok(Json(true))
}
