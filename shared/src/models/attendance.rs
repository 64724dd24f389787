//! Attendance Models (考勤)
//!
//! Two record kinds live here:
//! - [`LocationRecord`]: one row per geofence check reported by a device
//! - [`AttendanceRecord`]: the daily manual attendance sheet kept by admins

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the employee was doing when the position was reported
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum LocationKind {
    #[default]
    CheckIn,
    CheckOut,
    LocationUpdate,
}

/// Why a device could not produce a position fix
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
    Unknown,
}

impl GeolocationError {
    /// Human-readable cause shown to the employee
    pub fn message(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => "Location access denied by user",
            GeolocationError::PositionUnavailable => "Location information unavailable",
            GeolocationError::Timeout => "Location request timed out",
            GeolocationError::Unsupported => "Geolocation is not supported by this device",
            GeolocationError::Unknown => "Unknown error occurred",
        }
    }
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Device report: either a fix or the reason there is none
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PositionReport {
    Fix {
        latitude: f64,
        longitude: f64,
        /// Accuracy radius in meters
        #[serde(default)]
        accuracy: f64,
    },
    Failed {
        code: GeolocationError,
    },
}

/// Geofence check request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCheckRequest {
    #[serde(default)]
    pub kind: LocationKind,
    pub position: PositionReport,
    pub device_info: Option<String>,
}

/// Stored geofence check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LocationRecord {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub kind: LocationKind,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub is_within_office: bool,
    /// Matched zone, or nearest zone when outside
    pub office_name: String,
    /// Distance in meters to `office_name`
    pub distance: f64,
    pub device_info: Option<String>,
    pub created_at: i64,
}

/// Geofence check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCheckResponse {
    pub is_within_office: bool,
    pub office_name: String,
    pub distance: f64,
    pub message: String,
    pub record: LocationRecord,
}

/// Location record filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub employee_id: Option<i64>,
}

/// Per-day presence summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationSummary {
    pub date: String,
    /// Distinct employees with at least one check inside a zone
    pub inside: i64,
    /// Distinct employees whose checks were all outside
    pub outside: i64,
    pub total_checks: i64,
}

/// Daily attendance status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    HalfDay,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Late => write!(f, "late"),
            AttendanceStatus::HalfDay => write!(f, "half_day"),
        }
    }
}

/// Daily attendance record, unique per (employee, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub check_in: Option<String>,
    /// `HH:MM`
    pub check_out: Option<String>,
    pub status: AttendanceStatus,
    pub working_hours: f64,
    pub notes: Option<String>,
    pub updated_at: i64,
}

/// Upsert attendance payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceUpsert {
    pub employee_id: Option<i64>,
    pub date: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

/// Attendance list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceQuery {
    /// `YYYY-MM-DD`, defaults to today
    pub date: Option<String>,
}
