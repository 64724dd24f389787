//! Unified error codes for the staff service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Leave errors
//! - 5xxx: Attendance / geofence errors
//! - 6xxx: Task errors
//! - 8xxx: Employee / department errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests
    RateLimited = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Leave ====================
    /// Leave request not found
    LeaveNotFound = 4001,
    /// Leave request already decided
    LeaveAlreadyDecided = 4002,
    /// Leave date range is invalid
    LeaveInvalidRange = 4003,
    /// Leave decision status is invalid
    LeaveInvalidStatus = 4004,

    // ==================== 5xxx: Attendance ====================
    /// No office locations configured
    NoOfficeLocations = 5001,
    /// Device could not provide a location
    GeolocationFailed = 5002,
    /// Coordinates out of range
    InvalidCoordinates = 5003,
    /// Office location not found
    OfficeLocationNotFound = 5004,
    /// Office location name already exists
    OfficeLocationNameExists = 5005,
    /// Attendance times are inconsistent
    InvalidAttendanceTimes = 5006,

    // ==================== 6xxx: Task ====================
    /// Task not found
    TaskNotFound = 6001,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Employee email already exists
    EmployeeEmailExists = 8002,
    /// Department not found
    DepartmentNotFound = 8101,
    /// Department name already exists
    DepartmentNameExists = 8102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",
            Self::RateLimited => "Too many requests, try again later",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account is disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",

            Self::LeaveNotFound => "Leave request not found",
            Self::LeaveAlreadyDecided => "Leave request has already been decided",
            Self::LeaveInvalidRange => "End date must not be before start date",
            Self::LeaveInvalidStatus => "Invalid status",

            Self::NoOfficeLocations => "No office locations configured",
            Self::GeolocationFailed => "Unable to determine location",
            Self::InvalidCoordinates => "Coordinates out of range",
            Self::OfficeLocationNotFound => "Office location not found",
            Self::OfficeLocationNameExists => "Office location name already exists",
            Self::InvalidAttendanceTimes => "Check-out must not be before check-in",

            Self::TaskNotFound => "Task not found",

            Self::EmployeeNotFound => "Employee not found",
            Self::EmployeeEmailExists => "Email already exists",
            Self::DepartmentNotFound => "Department not found",
            Self::DepartmentNameExists => "Department already exists",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

/// Error returned when a u16 does not map to any [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            7 => Ok(Self::RequiredField),
            9 => Ok(Self::RateLimited),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            1007 => Ok(Self::AccountDisabled),

            2001 => Ok(Self::PermissionDenied),
            2003 => Ok(Self::AdminRequired),

            4001 => Ok(Self::LeaveNotFound),
            4002 => Ok(Self::LeaveAlreadyDecided),
            4003 => Ok(Self::LeaveInvalidRange),
            4004 => Ok(Self::LeaveInvalidStatus),

            5001 => Ok(Self::NoOfficeLocations),
            5002 => Ok(Self::GeolocationFailed),
            5003 => Ok(Self::InvalidCoordinates),
            5004 => Ok(Self::OfficeLocationNotFound),
            5005 => Ok(Self::OfficeLocationNameExists),
            5006 => Ok(Self::InvalidAttendanceTimes),

            6001 => Ok(Self::TaskNotFound),

            8001 => Ok(Self::EmployeeNotFound),
            8002 => Ok(Self::EmployeeEmailExists),
            8101 => Ok(Self::DepartmentNotFound),
            8102 => Ok(Self::DepartmentNameExists),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9101 => Ok(Self::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
