//! CSV Export Handlers

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use shared::models::{AttendanceQuery, LeaveAnalyticsQuery, LeaveQuery};

use crate::core::ServerState;
use crate::db::repository::{attendance, employee, leave};
use crate::export;
use crate::leave::analytics;
use crate::utils::{AppError, AppResult, Query, validation};

fn csv_response(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn employees(State(state): State<ServerState>) -> AppResult<Response> {
    let rows = employee::find_all(state.pool()).await?;
    Ok(csv_response("employees.csv", export::employees_csv(&rows)?))
}

pub async fn leaves(State(state): State<ServerState>) -> AppResult<Response> {
    let rows = leave::find_all(state.pool(), &LeaveQuery::default()).await?;
    Ok(csv_response("leaves.csv", export::leaves_csv(&rows)?))
}

/// One day of attendance, `?date=YYYY-MM-DD` (defaults to today)
pub async fn attendance(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Response> {
    let date = match query.date.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => validation::date(v, "date")
            .map_err(AppError::validation)?
            .format(shared::util::DATE_FORMAT)
            .to_string(),
        None => shared::util::today(),
    };
    let rows = attendance::find_by_date(state.pool(), &date, None).await?;
    Ok(csv_response(
        &format!("attendance-{date}.csv"),
        export::attendance_csv(&rows)?,
    ))
}

pub async fn payroll(State(state): State<ServerState>) -> AppResult<Response> {
    let rows = employee::find_all(state.pool()).await?;
    Ok(csv_response("payroll.csv", export::payroll_csv(&rows)?))
}

/// Leave analytics report, same filters as `GET /api/leaves/analytics`
pub async fn leave_analytics(
    State(state): State<ServerState>,
    Query(query): Query<LeaveAnalyticsQuery>,
) -> AppResult<Response> {
    let report = analytics::report(state.pool(), query).await?;
    Ok(csv_response(
        &format!("leave-analytics-{}.csv", report.period_label()),
        export::leave_analytics_csv(&report)?,
    ))
}
