//! 地理围栏考勤检查 (Geofence Attendance Check)
//!
//! 将设备上报的坐标与办公地点列表比较：
//! - 距离 ≤ 半径即在围栏内，多个命中时取列表中的第一个
//! - 全部不命中时报告最近的办公地点 (距离严格更小才替换，平局保留靠前者)
//! - 列表为空时检查失败，不写记录

use shared::models::{
    LocationCheckRequest, LocationCheckResponse, OfficeLocation, PositionReport,
};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, ensure_employee};
use crate::db::repository::{employee, location_record, office_location};
use crate::notify::{NotificationService, events};
use crate::utils::validation::{self, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two WGS84 points
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Result of classifying one point
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceMatch<'a> {
    pub is_within: bool,
    /// Matched zone, or the nearest zone when outside
    pub office: &'a OfficeLocation,
    pub distance: f64,
}

/// Classify a point against the zones, in list order
///
/// Returns `None` for an empty zone list.
pub fn classify(latitude: f64, longitude: f64, zones: &[OfficeLocation]) -> Option<GeofenceMatch<'_>> {
    let mut nearest: Option<GeofenceMatch<'_>> = None;

    for office in zones {
        let distance = haversine_distance(latitude, longitude, office.latitude, office.longitude);
        if distance <= office.radius {
            return Some(GeofenceMatch {
                is_within: true,
                office,
                distance,
            });
        }
        if nearest.as_ref().is_none_or(|n| distance < n.distance) {
            nearest = Some(GeofenceMatch {
                is_within: false,
                office,
                distance,
            });
        }
    }

    nearest
}

/// Run a geofence check for the current employee
///
/// Stores a location record for every successful classification and raises
/// a `location_alert` when the point is outside all zones.
pub async fn check(
    pool: &SqlitePool,
    notifier: &NotificationService,
    user: &CurrentUser,
    request: LocationCheckRequest,
) -> AppResult<LocationCheckResponse> {
    ensure_employee(user)?;

    let (latitude, longitude, accuracy) = match request.position {
        PositionReport::Fix {
            latitude,
            longitude,
            accuracy,
        } => (latitude, longitude, accuracy),
        PositionReport::Failed { code } => {
            tracing::warn!(employee_id = user.id, code = ?code, "Geolocation failed on device");
            return Err(AppError::with_message(ErrorCode::GeolocationFailed, code.message())
                .with_detail("reason", code.message()));
        }
    };

    validation::coordinates(latitude, longitude)
        .map_err(|e| AppError::with_message(ErrorCode::InvalidCoordinates, e))?;
    if !accuracy.is_finite() || accuracy < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidCoordinates,
            format!("accuracy cannot be negative: {accuracy}"),
        ));
    }
    let device_info =
        validation::optional_text(request.device_info.as_deref(), "device_info", MAX_SHORT_TEXT_LEN)
            .map_err(AppError::validation)?;

    let me = employee::find_by_id(pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    let zones = office_location::find_all(pool).await?;
    let matched = classify(latitude, longitude, &zones)
        .ok_or_else(|| AppError::new(ErrorCode::NoOfficeLocations))?;

    let record = location_record::insert(
        pool,
        location_record::NewLocationRecord {
            employee_id: me.id,
            employee_name: me.name.clone(),
            kind: request.kind,
            latitude,
            longitude,
            accuracy,
            is_within_office: matched.is_within,
            office_name: matched.office.name.clone(),
            distance: matched.distance,
            device_info,
        },
    )
    .await?;

    let meters = matched.distance.round() as i64;
    let message = if matched.is_within {
        format!(
            "Location verified! You are within {} ({}m away)",
            matched.office.name, meters
        )
    } else {
        format!(
            "You are outside office premises. Distance to {}: {}m",
            matched.office.name, meters
        )
    };

    tracing::info!(
        employee_id = me.id,
        office = %matched.office.name,
        distance = meters,
        within = matched.is_within,
        "Geofence check recorded"
    );

    if !record.is_within_office {
        notifier.emit(events::location_alert(&record)).await;
    }

    Ok(LocationCheckResponse {
        is_within_office: record.is_within_office,
        office_name: record.office_name.clone(),
        distance: record.distance,
        message,
        record,
    })
}
