//! Attendance API Handlers

use axum::extract::State;
use chrono::NaiveDate;
use shared::models::{
    AttendanceQuery, AttendanceRecord, AttendanceUpsert, LocationCheckRequest,
    LocationCheckResponse, LocationQuery, LocationRecord, LocationSummary,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{attendance, employee, location_record};
use crate::geofence;
use crate::utils::validation::{self, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult, ErrorCode, Json, Query, time};

/// `date` query value, defaulting to today (UTC)
fn date_or_today(value: Option<&str>) -> AppResult<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => validation::date(v, "date").map_err(AppError::validation),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(shared::util::DATE_FORMAT).to_string()
}

/// Geofence check for the calling employee
pub async fn check_location(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LocationCheckRequest>,
) -> AppResult<Json<LocationCheckResponse>> {
    let response = geofence::check(state.pool(), &state.notifications, &user, payload).await?;
    Ok(Json(response))
}

/// Location records, newest first; employees only get their own
pub async fn list_locations(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<LocationRecord>>> {
    let date = match query.date.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(validation::date(v, "date").map_err(AppError::validation)?),
        None => None,
    };
    let employee_id = if user.is_admin() {
        query.employee_id
    } else {
        Some(user.id)
    };
    let records = location_record::find_all(state.pool(), date, employee_id).await?;
    Ok(Json(records))
}

pub async fn location_summary(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<LocationSummary>> {
    let date = date_or_today(query.date.as_deref())?;
    let summary = location_record::summary(state.pool(), date).await?;
    Ok(Json(summary))
}

/// Daily attendance sheet for one date
pub async fn list_records(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let date = format_date(date_or_today(query.date.as_deref())?);
    let employee_id = (!user.is_admin()).then_some(user.id);
    let records = attendance::find_by_date(state.pool(), &date, employee_id).await?;
    Ok(Json(records))
}

/// Insert or replace the record for (employee_id, date)
///
/// Working hours are derived from the clock times, never taken from input.
pub async fn upsert_record(
    State(state): State<ServerState>,
    Json(payload): Json<AttendanceUpsert>,
) -> AppResult<Json<AttendanceRecord>> {
    let employee_id = payload
        .employee_id
        .ok_or_else(|| AppError::required("employee_id"))?;
    let date = validation::required_date(payload.date.as_deref(), "date")
        .map_err(AppError::validation)?;

    let check_in = clock_field(payload.check_in.as_deref(), "check_in")?;
    let check_out = clock_field(payload.check_out.as_deref(), "check_out")?;
    let working_hours = time::working_hours(check_in.as_deref(), check_out.as_deref())
        .map_err(|e| AppError::with_message(ErrorCode::InvalidAttendanceTimes, e))?;
    let notes = validation::optional_text(payload.notes.as_deref(), "notes", MAX_NOTE_LEN)
        .map_err(AppError::validation)?;

    let subject = employee::find_by_id(state.pool(), employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    let record = attendance::upsert(
        state.pool(),
        attendance::AttendanceEntry {
            employee_id: subject.id,
            employee_name: subject.name,
            date: format_date(date),
            check_in,
            check_out,
            status: payload.status.unwrap_or_default(),
            working_hours,
            notes,
        },
    )
    .await?;

    tracing::info!(
        employee_id,
        date = %record.date,
        hours = record.working_hours,
        "Attendance record saved"
    );
    Ok(Json(record))
}

/// Normalize an optional `HH:MM` field; blank counts as missing
fn clock_field(value: Option<&str>, field: &str) -> AppResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            let parsed = validation::clock_time(v, field).map_err(AppError::validation)?;
            Ok(Some(parsed.format("%H:%M").to_string()))
        }
        None => Ok(None),
    }
}
